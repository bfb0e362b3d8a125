//! News & sentiment topic filters.

use std::fmt;

/// Topics the news endpoint understands.
pub const SUPPORTED_TOPICS: &[&str] = &[
    "earnings",
    "ipo",
    "mergers_and_acquisitions",
    "financial_markets",
    "economy_fiscal",
    "economy_monetary",
    "economy_macro",
    "energy_transportation",
    "finance",
    "life_sciences",
    "manufacturing",
    "real_estate",
    "retail_wholesale",
    "technology",
];

/// Number of articles requested when the caller does not say.
pub const DEFAULT_NEWS_LIMIT: u32 = 50;

/// Topic filter for [`market_news_sentiment`](crate::AlphaVantageClient::market_news_sentiment).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Topics {
    /// Individual topics, sent comma-joined.
    List(Vec<String>),
    /// A preformatted value, sent untouched.
    Raw(String),
}

impl Topics {
    /// Value of the `topics` query parameter.
    #[must_use]
    pub fn to_param(&self) -> String {
        match self {
            Self::List(topics) => topics.join(","),
            Self::Raw(raw) => raw.clone(),
        }
    }

    /// Returns true for an empty list; such a filter is not sent at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::List(topics) if topics.is_empty())
    }

    /// Topics not in [`SUPPORTED_TOPICS`].
    #[must_use]
    pub fn unsupported(&self) -> Vec<&str> {
        let topics: Vec<&str> = match self {
            Self::List(topics) => topics.iter().map(String::as_str).collect(),
            Self::Raw(raw) => raw.split(',').map(str::trim).collect(),
        };
        topics
            .into_iter()
            .filter(|t| !t.is_empty() && !SUPPORTED_TOPICS.contains(t))
            .collect()
    }
}

impl fmt::Display for Topics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl From<&str> for Topics {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for Topics {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<Vec<String>> for Topics {
    fn from(topics: Vec<String>) -> Self {
        Self::List(topics)
    }
}

impl From<Vec<&str>> for Topics {
    fn from(topics: Vec<&str>) -> Self {
        Self::List(topics.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Topics {
    fn from(topics: [&str; N]) -> Self {
        Self::List(topics.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Topics::from(["technology", "ipo"]), "technology,ipo")]
    #[case(Topics::from("technology,ipo"), "technology,ipo")]
    #[case(Topics::from("technology, ipo"), "technology, ipo")]
    #[case(Topics::from(Vec::<String>::new()), "")]
    fn test_topics_param(#[case] topics: Topics, #[case] expected: &str) {
        assert_eq!(topics.to_param(), expected);
    }

    #[test]
    fn test_unsupported_topics() {
        let topics = Topics::from(["technology", "crypto"]);
        assert_eq!(topics.unsupported(), vec!["crypto"]);
        assert!(Topics::from("earnings, ipo").unsupported().is_empty());
    }

    #[test]
    fn test_only_empty_list_is_empty() {
        assert!(Topics::List(Vec::new()).is_empty());
        assert!(!Topics::from(["ipo"]).is_empty());
        assert!(!Topics::from("").is_empty());
    }
}
