//! Category classifier: keyword-scored, priority-ordered mapping of a problem
//! description onto the nine fixed AI-application categories.
//!
//! Pure and deterministic, no LLM call. Runs on the user's original text, never
//! on model output.
//!
//! Algorithm:
//! 1. Lower-case the text.
//! 2. Score every category: +1 per keyword that occurs as a substring.
//! 3. Walk `Category::PRIORITY` (narrowest first, Automation last) and return
//!    the first category with a score above zero.
//! 4. Nothing matched → `Category::DEFAULT`.
//!
//! Matching is plain substring containment, so a keyword inside a longer word
//! counts ("texto" matches "contexto").

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Automatización")]
    Automation,
    #[serde(rename = "Análisis de datos / predicción")]
    DataAnalysis,
    #[serde(rename = "Procesamiento de texto")]
    TextProcessing,
    #[serde(rename = "Procesamiento de imágenes / video")]
    ImageVideo,
    #[serde(rename = "Procesamiento de audio / voz")]
    AudioVoice,
    #[serde(rename = "Generación de contenido")]
    ContentGeneration,
    #[serde(rename = "Recomendación / personalización")]
    Recommendation,
    #[serde(rename = "Optimización / decisión inteligente")]
    Optimization,
    #[serde(rename = "Asistentes conversacionales")]
    ConversationalAssistant,
}

impl Category {
    /// Display order used by listings and the dashboard.
    pub const ALL: [Category; 9] = [
        Category::Automation,
        Category::DataAnalysis,
        Category::TextProcessing,
        Category::ImageVideo,
        Category::AudioVoice,
        Category::ContentGeneration,
        Category::Recommendation,
        Category::Optimization,
        Category::ConversationalAssistant,
    ];

    /// Tie-break order: most specific first, the generic Automation last.
    pub const PRIORITY: [Category; 9] = [
        Category::ConversationalAssistant,
        Category::Optimization,
        Category::Recommendation,
        Category::ContentGeneration,
        Category::AudioVoice,
        Category::ImageVideo,
        Category::TextProcessing,
        Category::DataAnalysis,
        Category::Automation,
    ];

    pub const DEFAULT: Category = Category::Automation;

    /// Canonical label, as stored and sent over the wire.
    pub fn label(self) -> &'static str {
        match self {
            Category::Automation => "Automatización",
            Category::DataAnalysis => "Análisis de datos / predicción",
            Category::TextProcessing => "Procesamiento de texto",
            Category::ImageVideo => "Procesamiento de imágenes / video",
            Category::AudioVoice => "Procesamiento de audio / voz",
            Category::ContentGeneration => "Generación de contenido",
            Category::Recommendation => "Recomendación / personalización",
            Category::Optimization => "Optimización / decisión inteligente",
            Category::ConversationalAssistant => "Asistentes conversacionales",
        }
    }

    /// ASCII key for chart series and JSON object keys.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Automation => "automatizacion",
            Category::DataAnalysis => "analisis_datos_prediccion",
            Category::TextProcessing => "procesamiento_texto",
            Category::ImageVideo => "procesamiento_imagenes_video",
            Category::AudioVoice => "procesamiento_audio_voz",
            Category::ContentGeneration => "generacion_contenido",
            Category::Recommendation => "recomendacion_personalizacion",
            Category::Optimization => "optimizacion_decision_inteligente",
            Category::ConversationalAssistant => "asistentes_conversacionales",
        }
    }

    /// Exact label match only: case, accents and surrounding spaces all matter.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Lower-case keywords and phrases that vote for this category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Automation => &[
                "automatización",
                "automatizar",
                "automatizado",
                "robots",
                "workflow",
                "procesos",
                "tareas repetitivas",
                "eficiencia",
                "agilizar",
            ],
            Category::DataAnalysis => &[
                "análisis",
                "datos",
                "predicción",
                "predictivo",
                "estadísticas",
                "machine learning",
                "aprendizaje automático",
                "forecast",
                "proyección",
                "modelo predictivo",
                "big data",
                "insights",
                "tendencias",
            ],
            Category::TextProcessing => &[
                "texto",
                "procesar texto",
                "nlp",
                "lenguaje natural",
                "traducir",
                "resumir",
                "escribir",
                "corrección",
                "edición",
                "documentos",
            ],
            Category::ImageVideo => &[
                "imágenes",
                "video",
                "procesamiento visual",
                "reconocimiento imagen",
                "computer vision",
                "detección objetos",
                "clasificación imagen",
                "edición video",
            ],
            Category::AudioVoice => &[
                "audio",
                "voz",
                "speech",
                "reconocimiento voz",
                "sintetizador voz",
                "transcripción",
                "podcasts",
                "música",
            ],
            Category::ContentGeneration => &[
                "generar",
                "contenido",
                "crear",
                "escribir",
                "diseño",
                "arte",
                "música",
                "vídeos",
                "marketing creativo",
            ],
            Category::Recommendation => &[
                "recomendación",
                "personalización",
                "sugerencias",
                "preferencias",
                "usuario",
                "personalizado",
                "tailored",
                "sistemas recomendación",
            ],
            Category::Optimization => &[
                "optimización",
                "decisión",
                "inteligente",
                "planificación",
                "estrategia",
                "mejorar",
                "eficiente",
                "ruteo",
                "logística",
            ],
            Category::ConversationalAssistant => &[
                "asistente",
                "chatbot",
                "conversacional",
                "dialogo",
                "ayuda virtual",
                "soporte",
                "preguntas",
                "respuestas",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of this category's keywords contained in already lower-cased text.
pub fn keyword_score(lowered: &str, category: Category) -> usize {
    category
        .keywords()
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count()
}

/// Classifies a problem description. Total: falls back to `Category::DEFAULT`.
pub fn classify(problem: &str) -> Category {
    let lowered = problem.to_lowercase();
    Category::PRIORITY
        .into_iter()
        .find(|&category| keyword_score(&lowered, category) > 0)
        .unwrap_or(Category::DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatbot_is_conversational_assistant() {
        assert_eq!(
            classify("Chatbot para atención al cliente"),
            Category::ConversationalAssistant
        );
        assert_eq!(
            classify("Chatbot para atención al cliente").label(),
            "Asistentes conversacionales"
        );
    }

    #[test]
    fn test_sales_prediction_is_data_analysis() {
        assert_eq!(
            classify("Sistema de predicción de ventas").label(),
            "Análisis de datos / predicción"
        );
    }

    #[test]
    fn test_invoice_automation_is_automation() {
        assert_eq!(
            classify("Automatizar proceso de facturación").label(),
            "Automatización"
        );
    }

    #[test]
    fn test_empty_text_falls_back_to_default() {
        assert_eq!(classify(""), Category::DEFAULT);
        assert_eq!(classify("").label(), "Automatización");
    }

    #[test]
    fn test_no_keyword_falls_back_to_default() {
        assert_eq!(classify("Quiero vender más zapatos"), Category::Automation);
    }

    #[test]
    fn test_matching_is_case_insensitive_on_input() {
        assert_eq!(classify("CHATBOT INTERNO"), Category::ConversationalAssistant);
        assert_eq!(classify("ANÁLISIS DE VENTAS"), Category::DataAnalysis);
    }

    #[test]
    fn test_priority_beats_raw_score() {
        // Three data-analysis keywords vs one conversational keyword.
        let text = "asistente con análisis de datos y predicción";
        let lowered = text.to_lowercase();
        assert_eq!(keyword_score(&lowered, Category::DataAnalysis), 3);
        assert_eq!(keyword_score(&lowered, Category::ConversationalAssistant), 1);
        assert_eq!(classify(text), Category::ConversationalAssistant);
    }

    #[test]
    fn test_automation_only_wins_when_nothing_narrower_matches() {
        assert_eq!(
            classify("Automatizar la transcripción de reuniones"),
            Category::AudioVoice
        );
    }

    #[test]
    fn test_substring_match_inside_longer_word_counts() {
        // Known quirk: "texto" inside "contexto", "arte" inside "compartes".
        assert_eq!(classify("dame contexto sobre mi tienda"), Category::TextProcessing);
        assert_eq!(classify("si compartes el menú"), Category::ContentGeneration);
    }

    #[test]
    fn test_no_stemming_or_fuzzy_matching() {
        // Unaccented spelling does not match the accented keyword.
        assert_eq!(keyword_score("prediccion", Category::DataAnalysis), 0);
        assert_eq!(classify("Chat-bot para la web"), Category::Automation);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for text in [
            "Chatbot para atención al cliente",
            "Sistema de predicción de ventas",
            "",
            "Optimizar rutas de logística",
        ] {
            assert_eq!(classify(text), classify(text));
        }
    }

    #[test]
    fn test_every_category_reachable_from_its_own_keywords() {
        for category in Category::ALL {
            let first = category.keywords()[0];
            let winner = classify(first);
            assert!(
                Category::PRIORITY.iter().position(|&c| c == winner)
                    <= Category::PRIORITY.iter().position(|&c| c == category),
                "{first} resolved to {winner}, which ranks below {category}"
            );
        }
    }

    #[test]
    fn test_label_round_trip_and_exact_match() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label(" Automatización "), None);
        assert_eq!(Category::from_label("Automatizacion"), None);
        assert_eq!(Category::from_label("automatización"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Category::ImageVideo).unwrap();
        assert_eq!(json, "\"Procesamiento de imágenes / video\"");
        let parsed: Category = serde_json::from_str("\"Asistentes conversacionales\"").unwrap();
        assert_eq!(parsed, Category::ConversationalAssistant);
    }

    #[test]
    fn test_priority_and_all_cover_the_same_nine_categories() {
        let mut priority = Category::PRIORITY.to_vec();
        let mut all = Category::ALL.to_vec();
        priority.sort_by_key(|c| c.slug());
        all.sort_by_key(|c| c.slug());
        assert_eq!(priority, all);
        assert_eq!(Category::PRIORITY.last(), Some(&Category::Automation));
    }
}
