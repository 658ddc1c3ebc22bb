//! Token inspection and logit-bias helpers.
//!
//! Debugging aid for seeing how schema column names or expected cell values
//! tokenize under the target model, and for nudging the model toward those
//! labels via a per-token bias map.

use anyhow::Result;
use std::collections::HashMap;

/// Token breakdown for one label.
#[derive(Debug, Clone)]
pub struct LabelTokens {
    pub label: String,
    pub tokens: Vec<u32>,
}

impl LabelTokens {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Encode each label with the tokenizer of the given model.
pub fn encode_labels(model: &str, labels: &[String]) -> Result<Vec<LabelTokens>> {
    let bpe = tiktoken_rs::get_bpe_from_model(model)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tokenizer for {}: {}", model, e))?;

    Ok(labels
        .iter()
        .map(|label| LabelTokens {
            label: label.clone(),
            tokens: bpe
                .encode_ordinary(label)
                .into_iter()
                .map(|token| token as u32)
                .collect(),
        })
        .collect())
}

/// Build a logit-bias map covering every token of every label.
///
/// Keys are token ids rendered as strings, the form the completions API
/// expects; tokens shared between labels are biased once.
pub fn logit_bias_for_labels(
    model: &str,
    labels: &[String],
    bias: i32,
) -> Result<HashMap<String, i32>> {
    let encoded = encode_labels(model, labels)?;

    let mut map = HashMap::new();
    for entry in &encoded {
        for token in &entry.tokens {
            map.insert(token.to_string(), bias);
        }
    }

    Ok(map)
}
