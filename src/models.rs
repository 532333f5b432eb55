use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============ Backend Models ============

/// A constituted ISSQN credit as returned by the credit API.
///
/// Only the two lookup keys are required; every other field is displayed
/// as-is when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credito {
    /// Credit number (lookup key for `/credito/{numero}`).
    #[serde(deserialize_with = "lenient_key")]
    pub numero_credito: String,
    /// NFS-e number the credit belongs to (lookup key for `/{numero}`).
    #[serde(deserialize_with = "lenient_key")]
    pub numero_nfse: String,
    /// Date the credit was constituted (`yyyy-MM-dd` on the wire).
    #[serde(default)]
    pub data_constituicao: Option<NaiveDate>,
    /// ISSQN amount.
    #[serde(default)]
    pub valor_issqn: Option<BigDecimal>,
    /// Credit type (e.g. "ISSQN").
    #[serde(default)]
    pub tipo_credito: Option<String>,
    /// Whether the taxpayer is in Simples Nacional ("Sim"/"Não").
    #[serde(default)]
    pub simples_nacional: Option<String>,
    /// Tax rate in percent.
    #[serde(default)]
    pub aliquota: Option<BigDecimal>,
    /// Invoiced amount.
    #[serde(default)]
    pub valor_faturado: Option<BigDecimal>,
    /// Deductions.
    #[serde(default)]
    pub valor_deducao: Option<BigDecimal>,
    /// Tax base.
    #[serde(default)]
    pub base_calculo: Option<BigDecimal>,
}

/// Accepts a key sent as a string, a number or `null` (read as empty).
fn lenient_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number key, got {}",
            other
        ))),
    }
}

impl Credito {
    /// Record carrying only the lookup keys.
    pub fn new(numero_credito: impl Into<String>, numero_nfse: impl Into<String>) -> Self {
        Self {
            numero_credito: numero_credito.into(),
            numero_nfse: numero_nfse.into(),
            data_constituicao: None,
            valor_issqn: None,
            tipo_credito: None,
            simples_nacional: None,
            aliquota: None,
            valor_faturado: None,
            valor_deducao: None,
            base_calculo: None,
        }
    }
}

/// Error payload sent by the credit API on non-2xx responses.
///
/// Every field is optional: the body is decoded best-effort and may be
/// absent altogether.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorBody {
    pub timestamp: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    /// Decodes a raw response body, yielding `None` for empty, non-JSON or
    /// non-object bodies.
    ///
    /// Each field is read on its own, so a field of an unexpected type is
    /// dropped without losing the others.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let value: Value = serde_json::from_str(raw).ok()?;
        let object = value.as_object()?;
        let text = |key: &str| match object.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        Some(Self {
            timestamp: text("timestamp"),
            status: object.get("status").and_then(|s| match s {
                Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            error: object.get("error").and_then(Value::as_str).map(str::to_string),
            message: object
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

// ============ View Models ============

/// Which key the user is searching by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// By NFS-e number; may return several credits.
    #[default]
    Nfse,
    /// By credit number; returns exactly one credit.
    Credito,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Nfse => "nfse",
            SearchMode::Credito => "credito",
        }
    }

    /// Label shown in the mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Nfse => "Número da NFS-e",
            SearchMode::Credito => "Número do Crédito",
        }
    }

    /// Message shown when the backend gives no usable message.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            SearchMode::Nfse => "Erro ao buscar créditos",
            SearchMode::Credito => "Erro ao buscar crédito",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "nfse" => Ok(SearchMode::Nfse),
            "credito" => Ok(SearchMode::Credito),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}
