use serde::{Deserialize, Deserializer, Serialize};

/// Request payload for `POST /submit_count`.
///
/// One physical count taken by a counter in the field. The backend never stores
/// it locally: it is turned into a single row appended to the `Input_Counts` tab
/// and then echoed back in the receipt. The submission carries no date, the
/// server stamps the row with its own local date.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CountSubmission {
    pub counter_name: String,
    pub store_name: String,
    pub sub_location: String,
    pub item_name: String,
    pub condition: String,
    /// A JSON number, or a string holding one (`"3.5"`), as form clients often send.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub qty: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {:?}", text)))?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom("qty must be a finite number"));
    }
    Ok(value)
}
