//! Party display names.

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("UML", "UML"),
    ("NC", "NC"),
    ("RSP", "RSP"),
    ("CPN", "CPN"),
    ("US", "US"),
    ("Communist Party of Nepal", "CPN"),
    ("Nepali Congress", "NC"),
    ("Rastriya Swatantra Party", "RSP"),
    ("UJyalo Nepal Party", "UNP"),
    ("UJyalo Nepal Party (UNP)", "UNP"),
    ("Unified Socialist", "US"),
];

const FULL_NAMES: &[(&str, &str)] = &[
    ("UML", "CPN (UML)"),
    ("Congress", "Nepali Congress"),
    ("RSP", "Rastriya Swatantra Party"),
    ("Maoist", "CPN (Maoist Centre)"),
    ("PLP", "Pragatisheel Loktantrik Party"),
    ("RPP", "Rastriya Prajatantra Party"),
    ("IND", "Independent"),
    ("ULP", "Unified Left Party"),
];

pub fn abbreviation(party: &str) -> String {
    if let Some((_, abbr)) = ABBREVIATIONS.iter().find(|(name, _)| *name == party) {
        return abbr.to_string();
    }

    let needle = party.to_lowercase();
    if !needle.is_empty() {
        for (name, abbr) in ABBREVIATIONS {
            let key = name.to_lowercase();
            if needle.contains(&key) || key.contains(&needle) {
                return abbr.to_string();
            }
        }
    }

    party.chars().take(3).collect::<String>().to_uppercase()
}

pub fn full_name(short: &str) -> &str {
    FULL_NAMES
        .iter()
        .find(|(s, _)| *s == short)
        .map(|(_, full)| *full)
        .unwrap_or(short)
}
