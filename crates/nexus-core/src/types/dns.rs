use serde::{Deserialize, Serialize};

/// Mail exchanger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    /// Exchange hostname
    pub exchange: String,

    /// Preference value (lower is preferred)
    pub priority: u16,
}

/// MX/TXT/NS records collected for a host.
///
/// `txt` is the flattened chunk list: record boundaries are lost. The grouped
/// form is kept alongside in `txt_records`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSet {
    /// Mail exchangers
    #[serde(default)]
    pub mx: Vec<MxRecord>,

    /// TXT chunks, flattened across records
    #[serde(default)]
    pub txt: Vec<String>,

    /// TXT chunks grouped per record
    #[serde(default)]
    pub txt_records: Vec<Vec<String>>,

    /// Authoritative name servers
    #[serde(default)]
    pub ns: Vec<String>,
}

impl DnsRecordSet {
    /// Build a record set, deriving the flat TXT list from the grouped one
    #[must_use]
    pub fn new(mx: Vec<MxRecord>, txt_records: Vec<Vec<String>>, ns: Vec<String>) -> Self {
        let txt = txt_records.iter().flatten().cloned().collect();
        Self {
            mx,
            txt,
            txt_records,
            ns,
        }
    }

    /// Returns true if no record of any type was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mx.is_empty() && self.txt_records.is_empty() && self.ns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_flattening_loses_grouping() {
        let set = DnsRecordSet::new(
            vec![],
            vec![
                vec!["v=spf1 ".into(), "-all".into()],
                vec!["google-site-verification=abc".into()],
            ],
            vec![],
        );
        assert_eq!(set.txt.len(), 3);
        assert_eq!(set.txt_records.len(), 2);
        assert_eq!(set.txt[1], "-all");
        assert!(!set.is_empty());
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(DnsRecordSet::default()).unwrap();
        assert!(json.get("txtRecords").is_some());
        assert!(DnsRecordSet::default().is_empty());
    }
}
