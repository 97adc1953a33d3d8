//! Generator configuration from the environment.

use std::path::PathBuf;

/// Where to read language data and write cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Restrict the run to these language directories.
    pub languages: Option<Vec<String>>,
}

impl GeneratorConfig {
    /// Read `INFLECTION_DATA_DIR`, `INFLECTION_OUTPUT_DIR` and `INFLECTION_LANGUAGES`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let languages = var("INFLECTION_LANGUAGES").map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        Self {
            data_dir: var("INFLECTION_DATA_DIR")
                .unwrap_or_else(|| "data".into())
                .into(),
            output_dir: var("INFLECTION_OUTPUT_DIR")
                .unwrap_or_else(|| "output".into())
                .into(),
            languages: languages.filter(|names| !names.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_vars(vars(&[]));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.languages, None);
    }

    #[test]
    fn test_language_list() {
        let config = GeneratorConfig::from_vars(vars(&[
            ("INFLECTION_DATA_DIR", "/srv/data"),
            ("INFLECTION_LANGUAGES", "english, german,"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(
            config.languages,
            Some(vec!["english".to_string(), "german".to_string()])
        );
    }

    #[test]
    fn test_blank_language_list_means_all() {
        let config = GeneratorConfig::from_vars(vars(&[("INFLECTION_LANGUAGES", " ")]));
        assert_eq!(config.languages, None);
    }
}
