//! Predict command implementation

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, PredictRequest, Prediction};
use crate::output::{color_confidence, print_info, OutputFormat};

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Text")]
    text: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

/// Classify a transaction description
pub async fn classify(client: &ApiClient, text: &str, format: OutputFormat) -> Result<()> {
    let request = PredictRequest {
        text: text.to_string(),
    };
    let prediction: Prediction = client.post("predict", &request).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&prediction)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let rows = vec![PredictionRow {
                text: truncate_text(text),
                category: prediction.category.clone(),
                confidence: match prediction.confidence {
                    Some(confidence) => color_confidence(confidence),
                    None => "n/a".to_string(),
                },
            }];

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if prediction.confidence.is_none() {
                print_info("Loaded model does not report confidence scores");
            }
        }
    }

    Ok(())
}

/// Truncate long transaction text for table display
fn truncate_text(text: &str) -> String {
    const MAX_CHARS: usize = 48;
    if text.chars().count() > MAX_CHARS {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
