//! Published spreadsheet addressing.

use url::Url;

use crate::cache::now_millis;
use crate::net::source::SourceError;

/// CSV export URL of one sheet, with a cache-busting `t` parameter.
pub fn sheet_url(base_url: &str, spreadsheet_id: &str, gid: &str) -> Result<Url, SourceError> {
    let raw = format!(
        "{}/{}/pub",
        base_url.trim_end_matches('/'),
        spreadsheet_id.trim_matches('/')
    );
    let mut url = Url::parse(&raw).map_err(|e| SourceError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("gid", gid)
        .append_pair("output", "csv")
        .append_pair("t", &now_millis().to_string());

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_url_shape() {
        let url = sheet_url("https://docs.google.com/spreadsheets/d/", "e/2PACX-abc", "439228131").unwrap();
        assert_eq!(url.path(), "/spreadsheets/d/e/2PACX-abc/pub");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("gid".to_string(), "439228131".to_string()));
        assert_eq!(pairs[1], ("output".to_string(), "csv".to_string()));
        assert_eq!(pairs[2].0, "t");
        assert!(pairs[2].1.parse::<u64>().is_ok());
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            sheet_url("not a url", "id", "1"),
            Err(SourceError::InvalidUrl { .. })
        ));
    }
}
