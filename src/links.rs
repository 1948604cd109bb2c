//! Where-to-buy search links for recommended medicines.

use crate::models::BuyLink;
use serde_json::Value;
use url::form_urlencoded;

const ONE_MG_SEARCH: &str = "https://www.1mg.com/search?name=";
const PHARMEASY_SEARCH: &str = "https://www.pharmeasy.com/search/all?name=";
const NETMEDS_SEARCH: &str = "https://www.netmeds.com/catalogsearch/result?q=";

/// Form-encode a query value (spaces become `+`).
///
/// Alphanumerics and `_.-~` pass through; `*` is escaped and `~` kept,
/// which `byte_serialize` alone does the other way round.
fn encode_query(value: &str) -> String {
    // A literal `%` is serialized as `%25`, so `%7E` only ever comes from `~`.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
}

pub fn buy_link(name: &str) -> BuyLink {
    let q = encode_query(name);
    BuyLink {
        name: name.to_string(),
        one_mg: format!("{}{}", ONE_MG_SEARCH, q),
        pharmeasy: format!("{}{}", PHARMEASY_SEARCH, q),
        netmeds: format!("{}{}", NETMEDS_SEARCH, q),
    }
}

/// One [`BuyLink`] per non-empty string entry, in input order.
///
/// Names are trimmed after the emptiness check, so a whitespace-only entry
/// still yields a link with an empty name.
pub fn build_buy_links(medicines: &[Value]) -> Vec<BuyLink> {
    medicines
        .iter()
        .filter_map(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(|name| buy_link(name.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_mixed_entries_are_filtered_in_order() {
        let medicines = vec![json!("Paracetamol"), json!(""), json!(42), json!("Ibuprofen")];
        let links = build_buy_links(&medicines);

        assert_eq!(
            links,
            vec![
                BuyLink {
                    name: "Paracetamol".to_string(),
                    one_mg: "https://www.1mg.com/search?name=Paracetamol".to_string(),
                    pharmeasy: "https://www.pharmeasy.com/search/all?name=Paracetamol".to_string(),
                    netmeds: "https://www.netmeds.com/catalogsearch/result?q=Paracetamol"
                        .to_string(),
                },
                BuyLink {
                    name: "Ibuprofen".to_string(),
                    one_mg: "https://www.1mg.com/search?name=Ibuprofen".to_string(),
                    pharmeasy: "https://www.pharmeasy.com/search/all?name=Ibuprofen".to_string(),
                    netmeds: "https://www.netmeds.com/catalogsearch/result?q=Ibuprofen".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_names_are_trimmed_and_encoded() {
        let links = build_buy_links(&[json!("  Vitamin D3 & Zinc ")]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Vitamin D3 & Zinc");
        assert_eq!(
            links[0].one_mg,
            "https://www.1mg.com/search?name=Vitamin+D3+%26+Zinc"
        );
        assert!(links[0].netmeds.ends_with("?q=Vitamin+D3+%26+Zinc"));
    }

    #[test]
    fn test_non_string_entries_are_skipped() {
        let links = build_buy_links(&[json!(null), json!(["x"]), json!({"n": 1}), json!(true)]);
        assert!(links.is_empty());
    }

    #[test]
    fn test_whitespace_only_name_still_yields_a_link() {
        let links = build_buy_links(&[json!("   "), json!(null), json!("Aspirin")]);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].name, "");
        assert_eq!(links[0].one_mg, "https://www.1mg.com/search?name=");
        assert_eq!(links[0].netmeds, "https://www.netmeds.com/catalogsearch/result?q=");
        assert_eq!(links[1].name, "Aspirin");
    }

    #[test]
    fn test_query_escapes_asterisk_and_keeps_tilde() {
        let link = buy_link("A*B~C");
        assert_eq!(link.one_mg, "https://www.1mg.com/search?name=A%2AB~C");
        assert_eq!(
            link.pharmeasy,
            "https://www.pharmeasy.com/search/all?name=A%2AB~C"
        );

        let link = buy_link("Zinc 50% ~*");
        assert_eq!(link.netmeds, "https://www.netmeds.com/catalogsearch/result?q=Zinc+50%25+~%2A");
    }

    #[test]
    fn test_build_is_deterministic() {
        let medicines = vec![json!("Cetirizine"), json!("Loratadine")];
        assert_eq!(build_buy_links(&medicines), build_buy_links(&medicines));
    }
}
