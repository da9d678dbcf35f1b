use crate::types::Year;
use serde::{Deserialize, Serialize};

/// Parameters of the built-in synthetic corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub seed:         u64,
    pub record_count: usize,
    pub year:         Year,
    pub products:     Vec<String>,
    pub cities:       Vec<String>,
    pub countries:    Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardConfigFile {
    total_visits: u64,
    corpus:       CorpusConfig,
}

#[derive(Debug, Clone)]
pub struct DashConfig {
    /// Unfiltered traffic baseline; the top of the funnel. Always > 0.
    pub total_visits: u64,
    pub corpus:       CorpusConfig,
}

impl DashConfig {
    /// Load from the data/ directory.
    /// In tests, use DashConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/dashboard_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: DashboardConfigFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let config = Self {
            total_visits: file.total_visits,
            corpus:       file.corpus,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.total_visits == 0 {
            anyhow::bail!("total_visits must be positive");
        }
        let catalog = [
            ("products", &self.corpus.products),
            ("cities", &self.corpus.cities),
            ("countries", &self.corpus.countries),
        ];
        for (name, values) in catalog {
            if values.is_empty() {
                anyhow::bail!("corpus.{name} must not be empty");
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            total_visits: 300_000,
            corpus: CorpusConfig {
                seed:         42,
                record_count: 2_000,
                year:         2023,
                products: [
                    "Crème hydratante", "Sérum anti-âge", "Masque purifiant",
                    "Huile essentielle", "Coffret soins visage", "Crème solaire",
                    "Lotion tonique", "Sérum vitamine C", "Gommage corps",
                    "Crème mains", "Huile de soin", "Masque hydratant",
                    "Crème anti-rides", "Sérum hydratant",
                ]
                .map(String::from)
                .to_vec(),
                cities: [
                    "Paris", "Lyon", "Marseille", "Bordeaux", "Lille", "Toulouse",
                    "Nice", "Nantes", "Strasbourg", "Montpellier", "Rennes",
                    "Reims", "Toulon", "Grenoble",
                ]
                .map(String::from)
                .to_vec(),
                countries: ["France", "Belgique", "Suisse"].map(String::from).to_vec(),
            },
        }
    }
}
