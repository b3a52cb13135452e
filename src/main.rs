use std::{env, process::ExitCode, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chhetra_poll::{
    api::{ApiClient, PollApi},
    config::Config,
    explore::CandidateFilter,
    identity::IdentityProvider,
    model::{Candidate, VoteType},
    pages::{self, CandidatePage, ChhetraPage, ExplorePage, PageState, Session},
    party,
    share::{self, Osc52Clipboard},
    storage::RocksStore,
    vote::{VoteController, VoteLedger},
};

const USAGE: &str = "usage: chhetra-poll <command>

  explore [--chhetra ID] [--party NAME] [QUERY...]
  chhetra ID
  candidate ID [--as-visitor TOKEN]
  vote ID support|oppose
  comment ID MESSAGE...
  like ID COMMENT_ID
  share URL
  contact EMAIL MESSAGE... [--name NAME]
  stats
  whoami";

#[tokio::main]
async fn main() -> ExitCode {
    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let config = Config::from_env();
    let api: Arc<dyn PollApi> = Arc::new(ApiClient::new(config.api_url.clone()));
    let identity = Arc::new(IdentityProvider::host(config.identity_timeout));

    match command.as_str() {
        "explore" => explore(api.as_ref(), rest).await,
        "stats" => {
            let totals = api.vote_stats().await.map_err(|e| anyhow!(e.message()))?;
            println!("🗳  {}+ {}−", totals.support, totals.oppose);
            Ok(())
        }
        "whoami" => {
            println!("{}", identity.get_identity().await);
            Ok(())
        }
        "share" => {
            let url = rest.first().context("share needs a URL")?;
            let link = share::build_share_url(&identity, &Osc52Clipboard, url).await?;
            println!("\n🔗 {link}");
            Ok(())
        }
        "contact" => contact(api.as_ref(), rest).await,
        "chhetra" | "candidate" | "vote" | "comment" | "like" => {
            let store = Arc::new(RocksStore::open(&config.store_path)?);
            let session = Session::new(api, identity, VoteLedger::new(store));
            match command.as_str() {
                "chhetra" => chhetra(&session, rest).await,
                "candidate" => candidate(session, rest).await,
                "vote" => vote(&session, rest).await,
                "like" => like(&session, rest).await,
                _ => comment(&session, rest).await,
            }
        }
        other => bail!("unknown command `{other}`\n\n{USAGE}"),
    }
}

fn parse_id(raw: Option<&str>, what: &str) -> Result<u64> {
    let raw = raw.with_context(|| format!("missing {what} id"))?;
    raw.parse()
        .with_context(|| format!("invalid {what} id `{raw}`"))
}

/// Splits `--flag value` pairs from positional words.
fn split_flags<'a>(
    args: &'a [String],
    flags: &[&'a str],
) -> Result<(Vec<(&'a str, &'a str)>, Vec<&'a str>)> {
    let mut found = Vec::new();
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(flag) = flags.iter().find(|f| **f == arg.as_str()) {
            let value = iter
                .next()
                .with_context(|| format!("{flag} needs a value"))?;
            found.push((*flag, value.as_str()));
        } else {
            words.push(arg.as_str());
        }
    }
    Ok((found, words))
}

fn ready<T>(state: PageState<T>) -> Result<T> {
    match state {
        PageState::Ready(page) => Ok(page),
        PageState::Failed(msg) => Err(anyhow!(msg)),
    }
}

fn print_candidate(candidate: &Candidate, votes: Option<(u64, u64, bool)>) {
    let (support, oppose, disabled) =
        votes.unwrap_or((candidate.support_count, candidate.oppose_count, false));
    let mark = if disabled { " ✓ voted" } else { "" };
    println!(
        "  #{:<4} {:<28} [{}]  {}+ {}−{}",
        candidate.id,
        candidate.name,
        party::abbreviation(&candidate.party),
        support,
        oppose,
        mark
    );
}

async fn explore(api: &dyn PollApi, args: &[String]) -> Result<()> {
    let (flags, words) = split_flags(args, &["--chhetra", "--party"])?;
    let mut filter = CandidateFilter {
        query: words.join(" "),
        ..Default::default()
    };
    for (flag, value) in flags {
        match flag {
            "--chhetra" => filter.chhetra = Some(parse_id(Some(value), "chhetra")?),
            _ => filter.party = Some(party::full_name(value).to_string()),
        }
    }

    let page = ready(ExplorePage::load(api).await)?;
    let stats = page.stats(&filter);
    println!(
        "Candidates {} · Chhetras {} · Parties {} · Total {}",
        stats.candidates, stats.chhetras, stats.parties, stats.total
    );

    let groups = page.groups(&filter);
    if groups.is_empty() {
        println!("No candidates found. Try adjusting your filters.");
    }
    for group in groups {
        println!(
            "\n📍 {} ({} candidate{})",
            group.chhetra.name,
            group.candidates.len(),
            if group.candidates.len() == 1 { "" } else { "s" }
        );
        for candidate in group.candidates {
            print_candidate(candidate, None);
        }
    }
    Ok(())
}

async fn print_controlled(candidate: &Candidate, votes: &VoteController) {
    let view = votes.view().await;
    print_candidate(
        candidate,
        Some((
            view.counts.support_count,
            view.counts.oppose_count,
            view.state.is_disabled(),
        )),
    );
}

async fn chhetra(session: &Session, args: &[String]) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "chhetra")?;
    let page = ready(ChhetraPage::load(session, id).await)?;
    if page.is_empty() {
        println!("No candidates found.");
    }
    for card in &page.cards {
        print_controlled(&card.candidate, &card.votes).await;
    }
    Ok(())
}

async fn candidate(session: Session, args: &[String]) -> Result<()> {
    let (flags, words) = split_flags(args, &["--as-visitor"])?;
    let id = parse_id(words.first().copied(), "candidate")?;
    let token = flags.first().map(|(_, v)| v.to_string());
    let session = session.with_shared_visitor(token);

    let page = ready(CandidatePage::load(&session, id).await)?;
    println!("{}", page.candidate.name);
    println!("{}", party::full_name(&page.candidate.party));
    if let Some(bio) = &page.candidate.bio {
        println!("{bio}");
    }
    print_controlled(&page.candidate, &page.votes).await;
    let view = page.votes.view().await;
    println!("  support {}%", view.counts.support_percentage());

    println!("\nPublic Opinions");
    for comment in page.comments.comments().await {
        println!("  • [{}] {} ♥{}", comment.id, comment.message, comment.like_count());
    }
    Ok(())
}

async fn vote(session: &Session, args: &[String]) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "candidate")?;
    let vote_type = args
        .get(1)
        .and_then(|raw| VoteType::parse(raw))
        .context("vote type must be `support` or `oppose`")?;

    let page = ready(CandidatePage::load(session, id).await)?;
    let counts = page.votes.vote(vote_type).await?;
    println!(
        "✓ Your vote recorded: {}+ {}−",
        counts.support_count, counts.oppose_count
    );
    Ok(())
}

async fn comment(session: &Session, args: &[String]) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "candidate")?;
    let message = args.get(1..).unwrap_or_default().join(" ");

    let page = ready(CandidatePage::load(session, id).await)?;
    let list = page.comments.post_comment(&message).await?;
    println!("✓ Posted. {} opinion(s) on {}", list.len(), page.candidate.name);
    Ok(())
}

async fn like(session: &Session, args: &[String]) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "candidate")?;
    let comment_id: i64 = args
        .get(1)
        .context("missing comment id")?
        .parse()
        .context("invalid comment id")?;

    let page = ready(CandidatePage::load(session, id).await)?;
    match page.comments.like(comment_id).await? {
        Some(likes) => println!("♥ {likes}"),
        None => println!("♥ liked"),
    }
    Ok(())
}

async fn contact(api: &dyn PollApi, args: &[String]) -> Result<()> {
    let (flags, words) = split_flags(args, &["--name"])?;
    let (email, message) = words
        .split_first()
        .context("contact needs an email and a message")?;
    let name = flags.first().map(|(_, v)| *v);

    let ack = pages::submit_contact(api, name, email, &message.join(" ")).await?;
    println!(
        "✓ {}",
        ack.message()
            .unwrap_or_else(|| "Thanks, we'll get back to you.".to_string())
    );
    Ok(())
}
