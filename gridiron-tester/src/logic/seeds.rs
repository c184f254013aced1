use anyhow::{Context, Result, bail};
use gridiron_game::{decode_to_seed, encode_friendly};
use std::collections::HashMap;

/// Seed metadata used by the scenario runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub const fn from_share_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// The code the user typed, or the canonical code for a numeric seed.
    #[must_use]
    pub fn share_code(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| encode_friendly(self.seed))
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers, `GR-` share codes, and the special keywords
/// `all` / `available` which expand to every share-code seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("all") || token.eq_ignore_ascii_case("available") {
            request_all = true;
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Some(seed) = decode_to_seed(token) {
            pending.push(SeedInfo::from_share_code(seed, token.to_uppercase()));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_share_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for info in pending {
        if let Some(&existing) = index.get(&info.seed) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.code.is_none()
                && info.code.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}

fn generate_all_share_code_seeds() -> Result<Vec<SeedInfo>> {
    use gridiron_game::seed::WORD_LIST;

    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100);
    for word in WORD_LIST {
        for suffix in 0..100 {
            let code = format!("GR-{word}{suffix:02}");
            let seed = decode_to_seed(&code)
                .with_context(|| format!("failed to parse share code: {code}"))?;
            seeds.push(SeedInfo::from_share_code(seed, code));
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_and_share_code() {
        let raw = vec![
            "42".to_string(),
            "-7".to_string(),
            "gr-blitz42".to_string(),
        ];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds.len(), 3);
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        assert!(
            seeds
                .iter()
                .any(|s| s.code.as_deref() == Some("GR-BLITZ42"))
        );
    }

    #[test]
    fn share_code_wins_over_duplicate_number() {
        let seed = decode_to_seed("GR-PUNT05").unwrap();
        let raw = vec![seed.to_string(), "GR-PUNT05".to_string()];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_share_code(seed, "GR-PUNT05".to_string())]);
    }

    #[test]
    fn expands_all_share_codes() {
        let seeds = resolve_seed_inputs(&["all".to_string()]).unwrap();
        assert_eq!(seeds.len(), gridiron_game::seed::WORD_LIST.len() * 100);
        assert!(seeds.iter().all(|s| s.code.is_some()));
    }

    #[test]
    fn rejects_garbage_and_defaults_when_empty() {
        assert!(resolve_seed_inputs(&["touchdown!".to_string()]).is_err());
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
        assert!(seeds[0].share_code().starts_with("GR-"));
    }
}
