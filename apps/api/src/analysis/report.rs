//! Typed feasibility report and its consumption-time checks.
//!
//! The service hands back the extracted document untouched; anything that wants
//! to trust scores goes through `FeasibilityReport::from_value` first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::analysis::extract::StructuredObject;

pub const KEY_INDEX_RANGE: std::ops::RangeInclusive<i64> = 1..=100;
pub const RADAR_SCORE_RANGE: std::ops::RangeInclusive<i64> = 1..=10;
pub const RADAR_AXES: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportViolation {
    #[error("report does not match the expected schema: {0}")]
    Schema(String),

    #[error("{index} score {score} is outside 1-100")]
    KeyIndexOutOfRange { index: &'static str, score: i64 },

    #[error("radar chart needs exactly 5 labels and 5 scores (got {labels} and {scores})")]
    RadarShape { labels: usize, scores: usize },

    #[error("radar score {score} at position {position} is outside 1-10")]
    RadarScoreOutOfRange { position: usize, score: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Ideal para IA")]
    IdealForAi,
    #[serde(rename = "Prometedor con Desafíos")]
    PromisingWithChallenges,
    #[serde(rename = "Poco Práctico")]
    Impractical,
    #[serde(rename = "Inapropiado para IA")]
    InappropriateForAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredIndex {
    #[serde(rename = "puntuacion")]
    pub score: i64,
    #[serde(rename = "justificacion")]
    pub justification: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyIndices {
    #[serde(rename = "adecuacion_ia")]
    pub ai_suitability: ScoredIndex,
    #[serde(rename = "factibilidad_tecnica")]
    pub technical_feasibility: ScoredIndex,
    #[serde(rename = "impacto_potencial")]
    pub potential_impact: ScoredIndex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    #[serde(rename = "justificacion_ia")]
    pub ai_justification: String,
    #[serde(rename = "requisitos_y_desafios_tecnicos")]
    pub technical_requirements: String,
    #[serde(rename = "analisis_coste_beneficio")]
    pub cost_benefit: String,
    #[serde(rename = "alternativas_no_ia")]
    pub non_ai_alternatives: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedQuery {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "consulta_completa")]
    pub full_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarChartData {
    pub labels: Vec<String>,
    #[serde(rename = "valoracion")]
    pub scores: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityReport {
    #[serde(rename = "titulo_proyecto")]
    pub title: String,
    #[serde(rename = "resumen_ejecutivo")]
    pub executive_summary: String,
    #[serde(rename = "veredicto_ia")]
    pub verdict: Verdict,
    #[serde(rename = "indices_clave")]
    pub key_indices: KeyIndices,
    #[serde(rename = "analisis_detallado")]
    pub detailed_analysis: DetailedAnalysis,
    #[serde(rename = "recomendaciones_estrategicas")]
    pub strategic_recommendations: Vec<String>,
    #[serde(rename = "consultas_relacionadas")]
    pub related_queries: Vec<RelatedQuery>,
    #[serde(rename = "datos_grafico_radar")]
    pub radar_chart_data: RadarChartData,
}

impl FeasibilityReport {
    /// Types and validates an extracted document. Anything but a JSON object,
    /// scores that are not integers, unknown verdicts and missing members are
    /// all schema violations.
    pub fn from_value(value: StructuredObject) -> Result<Self, ReportViolation> {
        if !value.is_object() {
            return Err(ReportViolation::Schema(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        let report: FeasibilityReport = serde_json::from_value(value)
            .map_err(|e| ReportViolation::Schema(e.to_string()))?;
        report.validate()?;
        Ok(report)
    }

    pub fn validate(&self) -> Result<(), ReportViolation> {
        let indices = &self.key_indices;
        for (index, scored) in [
            ("adecuacion_ia", &indices.ai_suitability),
            ("factibilidad_tecnica", &indices.technical_feasibility),
            ("impacto_potencial", &indices.potential_impact),
        ] {
            if !KEY_INDEX_RANGE.contains(&scored.score) {
                return Err(ReportViolation::KeyIndexOutOfRange {
                    index,
                    score: scored.score,
                });
            }
        }

        let radar = &self.radar_chart_data;
        if radar.labels.len() != RADAR_AXES || radar.scores.len() != RADAR_AXES {
            return Err(ReportViolation::RadarShape {
                labels: radar.labels.len(),
                scores: radar.scores.len(),
            });
        }
        if let Some((position, &score)) = radar
            .scores
            .iter()
            .enumerate()
            .find(|&(_, &score)| !RADAR_SCORE_RANGE.contains(&score))
        {
            return Err(ReportViolation::RadarScoreOutOfRange { position, score });
        }

        Ok(())
    }

    pub fn average_viability(&self) -> i64 {
        let indices = &self.key_indices;
        mean_of_three(
            indices.ai_suitability.score as f64,
            indices.technical_feasibility.score as f64,
            indices.potential_impact.score as f64,
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Average of the three key indices from a stored, untyped report.
/// `None` when the report has no `indices_clave` or a present score is not a
/// number; missing scores count as 0.
pub fn average_viability(report: &Value) -> Option<i64> {
    let indices = report.get("indices_clave")?;
    let score = |key: &str| match indices.get(key).and_then(|index| index.get("puntuacion")) {
        None => Some(0.0),
        Some(score) => score.as_f64(),
    };
    Some(mean_of_three(
        score("adecuacion_ia")?,
        score("factibilidad_tecnica")?,
        score("impacto_potencial")?,
    ))
}

/// Rounds half to even, so 84.5 → 84 and 85.5 → 86.
fn mean_of_three(a: f64, b: f64, c: f64) -> i64 {
    ((a + b + c) / 3.0).round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report_value() -> Value {
        json!({
            "titulo_proyecto": "Clasificador de facturas",
            "resumen_ejecutivo": "Viable con datos etiquetados.",
            "veredicto_ia": "Prometedor con Desafíos",
            "indices_clave": {
                "adecuacion_ia": {"puntuacion": 85, "justificacion": "Encaja"},
                "factibilidad_tecnica": {"puntuacion": 90, "justificacion": "Factible"},
                "impacto_potencial": {"puntuacion": 80, "justificacion": "Alto"}
            },
            "analisis_detallado": {
                "justificacion_ia": "OCR + clasificación",
                "requisitos_y_desafios_tecnicos": "Miles de facturas etiquetadas",
                "analisis_coste_beneficio": "Coste medio",
                "alternativas_no_ia": "Plantillas por proveedor"
            },
            "recomendaciones_estrategicas": ["Piloto", "Etiquetar datos", "Medir"],
            "consultas_relacionadas": [
                {"titulo": "Técnico", "descripcion": "Detalle", "consulta_completa": "Profundiza"}
            ],
            "datos_grafico_radar": {
                "labels": ["Adecuación", "Datos", "ROI", "Ventaja", "Complejidad"],
                "valoracion": [8, 9, 8, 7, 6]
            }
        })
    }

    #[test]
    fn test_valid_report_types_cleanly() {
        let report = FeasibilityReport::from_value(sample_report_value()).unwrap();
        assert_eq!(report.verdict, Verdict::PromisingWithChallenges);
        assert_eq!(report.key_indices.technical_feasibility.score, 90);
        assert_eq!(report.radar_chart_data.scores, vec![8, 9, 8, 7, 6]);
        assert_eq!(report.related_queries[0].full_query, "Profundiza");
        assert_eq!(report.average_viability(), 85);
    }

    #[test]
    fn test_unknown_verdict_is_schema_violation() {
        let mut value = sample_report_value();
        value["veredicto_ia"] = json!("Quizás");
        assert!(matches!(
            FeasibilityReport::from_value(value),
            Err(ReportViolation::Schema(_))
        ));
    }

    #[test]
    fn test_missing_member_is_schema_violation() {
        let mut value = sample_report_value();
        value.as_object_mut().unwrap().remove("analisis_detallado");
        assert!(matches!(
            FeasibilityReport::from_value(value),
            Err(ReportViolation::Schema(_))
        ));
    }

    #[test]
    fn test_fractional_score_is_schema_violation() {
        let mut value = sample_report_value();
        value["indices_clave"]["adecuacion_ia"]["puntuacion"] = json!(85.5);
        assert!(matches!(
            FeasibilityReport::from_value(value),
            Err(ReportViolation::Schema(_))
        ));
    }

    #[test]
    fn test_key_index_bounds() {
        for (score, ok) in [(0, false), (1, true), (100, true), (101, false), (-5, false)] {
            let mut value = sample_report_value();
            value["indices_clave"]["impacto_potencial"]["puntuacion"] = json!(score);
            let result = FeasibilityReport::from_value(value);
            assert_eq!(result.is_ok(), ok, "score {score}");
            if !ok {
                assert_eq!(
                    result.unwrap_err(),
                    ReportViolation::KeyIndexOutOfRange {
                        index: "impacto_potencial",
                        score
                    }
                );
            }
        }
    }

    #[test]
    fn test_radar_needs_exactly_five_entries() {
        let mut value = sample_report_value();
        value["datos_grafico_radar"]["valoracion"] = json!([8, 9, 8, 7]);
        assert_eq!(
            FeasibilityReport::from_value(value).unwrap_err(),
            ReportViolation::RadarShape {
                labels: 5,
                scores: 4
            }
        );
    }

    #[test]
    fn test_radar_scores_bounded_one_to_ten() {
        let mut value = sample_report_value();
        value["datos_grafico_radar"]["valoracion"] = json!([8, 9, 11, 7, 6]);
        assert_eq!(
            FeasibilityReport::from_value(value).unwrap_err(),
            ReportViolation::RadarScoreOutOfRange {
                position: 2,
                score: 11
            }
        );
    }

    #[test]
    fn test_average_viability_from_stored_value() {
        assert_eq!(average_viability(&sample_report_value()), Some(85));
        assert_eq!(average_viability(&json!({"titulo_proyecto": "x"})), None);
        assert_eq!(
            average_viability(&json!({"indices_clave": {"adecuacion_ia": {"puntuacion": 90}}})),
            Some(30)
        );
    }

    #[test]
    fn test_non_object_document_is_schema_violation() {
        let array = json!([sample_report_value(), sample_report_value()]);
        assert_eq!(
            FeasibilityReport::from_value(array).unwrap_err(),
            ReportViolation::Schema("expected a JSON object, got an array".into())
        );
        assert!(matches!(
            FeasibilityReport::from_value(json!("informe")),
            Err(ReportViolation::Schema(_))
        ));
    }

    #[test]
    fn test_non_numeric_stored_score_has_no_average() {
        let mut value = sample_report_value();
        value["indices_clave"]["factibilidad_tecnica"]["puntuacion"] = json!("80");
        assert_eq!(average_viability(&value), None);
        value["indices_clave"]["factibilidad_tecnica"]["puntuacion"] = Value::Null;
        assert_eq!(average_viability(&value), None);
    }

    #[test]
    fn test_average_rounds_half_to_even() {
        // 253.5 / 3 = 84.5, 256.5 / 3 = 85.5
        assert_eq!(mean_of_three(84.0, 84.0, 85.5), 84);
        assert_eq!(mean_of_three(100.0, 100.0, 53.5), 84);
        assert_eq!(mean_of_three(100.0, 100.0, 56.5), 86);
    }
}
