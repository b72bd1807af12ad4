//! Prompt builder: validates the problem description and renders the fixed
//! feasibility-analysis instruction shared by every provider.

use serde_json::Value;
use thiserror::Error;

/// Minimum number of characters (after trimming) a problem description needs.
pub const MIN_PROBLEM_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("a problem description is required")]
    NullInput,

    #[error("the problem description must be text")]
    WrongType,

    #[error("the problem description is empty")]
    Empty,

    #[error("the problem description must have at least 10 characters (got {len})")]
    TooShort { len: usize },
}

/// Extracts the problem text from an untyped request field.
pub fn problem_text(value: Option<&Value>) -> Result<&str, ValidationFailure> {
    match value {
        None | Some(Value::Null) => Err(ValidationFailure::NullInput),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(ValidationFailure::WrongType),
    }
}

/// Trims the description and checks it is long enough to analyse.
pub fn validate_problem(problem: &str) -> Result<&str, ValidationFailure> {
    let trimmed = problem.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::Empty);
    }
    let len = trimmed.chars().count();
    if len < MIN_PROBLEM_CHARS {
        return Err(ValidationFailure::TooShort { len });
    }
    Ok(trimmed)
}

/// Renders the analysis prompt for a problem description.
pub fn build_prompt(problem: &str) -> Result<String, ValidationFailure> {
    let problem = validate_problem(problem)?;
    Ok(FEASIBILITY_PROMPT_TEMPLATE.replace("{problem}", problem))
}

/// Feasibility prompt template. Replace `{problem}` before sending.
/// The schema below is the contract the extractor and `FeasibilityReport` consume.
pub const FEASIBILITY_PROMPT_TEMPLATE: &str = r#"ACTÚA COMO UN CONSULTOR SENIOR DE IA, PRAGMÁTICO Y CRÍTICO.
Tu objetivo no es ser optimista sino realista. Analiza los costes, los requisitos de datos y las alternativas que no usan IA. Tu reputación depende de evitar que los clientes inviertan en proyectos de IA inviables.
La respuesta DEBE SER ÚNICAMENTE un objeto JSON válido, sin ningún texto ni explicación fuera del propio JSON.

PROBLEMA O PROYECTO A ANALIZAR: {problem}

El objeto JSON de salida debe seguir estrictamente esta estructura:

{
  "titulo_proyecto": "Un título corto y descriptivo para la idea.",
  "resumen_ejecutivo": "Un párrafo de 2 a 4 frases que resuma el análisis, con el veredicto final y su principal justificación.",
  "veredicto_ia": "Exactamente UNA de estas categorías: 'Ideal para IA', 'Prometedor con Desafíos', 'Poco Práctico' o 'Inapropiado para IA'.",

  "indices_clave": {
    "adecuacion_ia": {
      "puntuacion": Un número entero del 1 al 100,
      "justificacion": "Si el problema encaja con las capacidades de la IA (predicción, clasificación, generación, etc.)."
    },
    "factibilidad_tecnica": {
      "puntuacion": Un número entero del 1 al 100,
      "justificacion": "Disponibilidad y calidad de los datos y complejidad tecnológica."
    },
    "impacto_potencial": {
      "puntuacion": Un número entero del 1 al 100,
      "justificacion": "Retorno de la inversión (ROI), eficiencia ganada o ventaja competitiva."
    }
  },

  "analisis_detallado": {
    "justificacion_ia": "Por qué la IA es (o no es) la herramienta adecuada, mencionando técnicas aplicables (NLP, visión por computador, modelos predictivos).",
    "requisitos_y_desafios_tecnicos": "Datos necesarios (volumen, calidad, etiquetado), infraestructura requerida y principales obstáculos técnicos.",
    "analisis_coste_beneficio": "Evaluación cualitativa de los costes (desarrollo, datos, mantenimiento) frente a los beneficios.",
    "alternativas_no_ia": "1 o 2 soluciones más simples, sin IA, que resuelvan parte o la totalidad del problema."
  },

  "recomendaciones_estrategicas": [
    "Entre 3 y 5 pasos concretos y accionables. Si el proyecto es viable, cómo iniciarlo; si no lo es, cómo redefinirlo o qué alternativas buscar."
  ],

  "consultas_relacionadas": [
    {
      "titulo": "Análisis de Aspectos Técnicos Avanzados",
      "descripcion": "Requerimientos técnicos específicos, infraestructura necesaria y desafíos de implementación de este proyecto.",
      "consulta_completa": "Basado en el análisis anterior sobre '{problem}', profundiza en los aspectos técnicos: ¿qué modelos de IA serían más apropiados? ¿Qué volumen y calidad de datos se necesitan? ¿Qué infraestructura computacional requeriría? ¿Cuáles son los principales cuellos de botella técnicos y cómo superarlos?"
    },
    {
      "titulo": "Evaluación Financiera y ROI Detallado",
      "descripcion": "Análisis financiero completo: costes de desarrollo y mantenimiento, retorno esperado y comparación con alternativas tradicionales.",
      "consulta_completa": "Continuando con el proyecto '{problem}' analizado anteriormente, realiza una evaluación financiera detallada: estima los costes de desarrollo e implementación, los ahorros o ingresos adicionales, el período de retorno de la inversión, y compáralo con soluciones convencionales sin IA."
    },
    {
      "titulo": "Estrategia de Implementación Paso a Paso",
      "descripcion": "Plan de implementación práctico con calendario, recursos necesarios y métricas de éxito para llevar el proyecto a producción.",
      "consulta_completa": "Para el proyecto '{problem}' que hemos evaluado, crea una estrategia de implementación detallada: define las fases con plazos realistas, identifica los recursos humanos y tecnológicos necesarios, establece métricas de éxito cuantificables y describe cómo validar los resultados en cada etapa."
    }
  ],

  "datos_grafico_radar": {
    "labels": ["Adecuación del Problema", "Factibilidad de Datos", "Impacto/ROI", "Ventaja Competitiva", "Complejidad Técnica"],
    "valoracion": [
      Un entero del 1 al 10 para la adecuación del problema a la IA,
      Un entero del 1 al 10 para la calidad y disponibilidad de los datos,
      Un entero del 1 al 10 para el retorno de inversión potencial,
      Un entero del 1 al 10 para la ventaja competitiva que genera,
      Un entero del 1 al 10 para la complejidad técnica (1 es extremadamente complejo y 10 es simple)
    ]
  }
}"#;
