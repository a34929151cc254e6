use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// Independent data category fetched for a signed-in user.
#[derive(
    Debug, Display, FromStr, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Tags,
    Records,
    Budgets,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Tags, Domain::Records, Domain::Budgets];
}

#[cfg(test)]
mod tests {
    use super::Domain;

    #[test]
    fn display_and_parse() {
        let names: Vec<String> = Domain::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["tags", "records", "budgets"]);
        assert_eq!("budgets".parse::<Domain>().unwrap(), Domain::Budgets);
        assert!("users".parse::<Domain>().is_err());
    }
}
