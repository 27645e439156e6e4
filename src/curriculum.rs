use serde::{Deserialize, Serialize};

use crate::calc::CalcError;

/// The four científico-humanísticos tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseKey {
    CienciasTecnologias,
    CienciasSocioeconomicas,
    LinguasHumanidades,
    ArtesVisuais,
}

impl CourseKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseKey::CienciasTecnologias => "ciencias_tecnologias",
            CourseKey::CienciasSocioeconomicas => "ciencias_socioeconomicas",
            CourseKey::LinguasHumanidades => "linguas_humanidades",
            CourseKey::ArtesVisuais => "artes_visuais",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageKey {
    Ingles,
    Frances,
    Alemao,
    Espanhol,
}

impl LanguageKey {
    pub fn slug(&self) -> &'static str {
        match self {
            LanguageKey::Ingles => "ingles",
            LanguageKey::Frances => "frances",
            LanguageKey::Alemao => "alemao",
            LanguageKey::Espanhol => "espanhol",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDef {
    pub key: CourseKey,
    pub name: &'static str,
    /// The mandatory three-year subject of the track.
    pub trienal: &'static str,
    /// Two-year electives; students take exactly two.
    pub bienal_pool: &'static [&'static str],
    /// 12.º ano opção D: the course's own scientific options.
    pub anual_primary_pool: &'static [&'static str],
}

const CIENCIAS_TECNOLOGIAS: CourseDef = CourseDef {
    key: CourseKey::CienciasTecnologias,
    name: "Ciências e Tecnologias",
    trienal: "matematica_a",
    bienal_pool: &["fisica_quimica_a", "biologia_geologia", "geometria_descritiva_a"],
    anual_primary_pool: &["biologia", "fisica", "quimica", "geologia"],
};

const CIENCIAS_SOCIOECONOMICAS: CourseDef = CourseDef {
    key: CourseKey::CienciasSocioeconomicas,
    name: "Ciências Socioeconómicas",
    trienal: "matematica_a",
    bienal_pool: &["economia_a", "geografia_a", "historia_b"],
    anual_primary_pool: &["economia_c", "geografia_c", "sociologia"],
};

const LINGUAS_HUMANIDADES: CourseDef = CourseDef {
    key: CourseKey::LinguasHumanidades,
    name: "Línguas e Humanidades",
    trienal: "historia_a",
    bienal_pool: &["geografia_a", "latim_a", "literatura_portuguesa", "macs"],
    anual_primary_pool: &[
        "filosofia_a",
        "geografia_c",
        "latim_b",
        "literaturas_lingua_portuguesa",
        "sociologia",
    ],
};

const ARTES_VISUAIS: CourseDef = CourseDef {
    key: CourseKey::ArtesVisuais,
    name: "Artes Visuais",
    trienal: "desenho_a",
    bienal_pool: &["geometria_descritiva_a", "matematica_b", "historia_cultura_artes"],
    anual_primary_pool: &["oficina_artes", "oficina_multimedia_b", "materiais_tecnologias"],
};

/// 12.º ano opção E: transversal options open to every course.
pub const ANUAL_SECONDARY_POOL: &[&str] = &[
    "aplicacoes_informaticas_b",
    "psicologia_b",
    "direito",
    "ciencia_politica",
];

pub fn course(key: CourseKey) -> &'static CourseDef {
    match key {
        CourseKey::CienciasTecnologias => &CIENCIAS_TECNOLOGIAS,
        CourseKey::CienciasSocioeconomicas => &CIENCIAS_SOCIOECONOMICAS,
        CourseKey::LinguasHumanidades => &LINGUAS_HUMANIDADES,
        CourseKey::ArtesVisuais => &ARTES_VISUAIS,
    }
}

pub fn all_courses() -> [&'static CourseDef; 4] {
    [
        &CIENCIAS_TECNOLOGIAS,
        &CIENCIAS_SOCIOECONOMICAS,
        &LINGUAS_HUMANIDADES,
        &ARTES_VISUAIS,
    ]
}

pub fn display_name(slug: &str) -> Option<&'static str> {
    let name = match slug {
        "portugues" => "Português",
        "educacao_fisica" => "Educação Física",
        "filosofia" => "Filosofia",
        "emrc" => "EMRC",
        "ingles" => "Inglês",
        "frances" => "Francês",
        "alemao" => "Alemão",
        "espanhol" => "Espanhol",
        "matematica_a" => "Matemática A",
        "historia_a" => "História A",
        "desenho_a" => "Desenho A",
        "fisica_quimica_a" => "Física e Química A",
        "biologia_geologia" => "Biologia e Geologia",
        "geometria_descritiva_a" => "Geometria Descritiva A",
        "economia_a" => "Economia A",
        "geografia_a" => "Geografia A",
        "historia_b" => "História B",
        "latim_a" => "Latim A",
        "literatura_portuguesa" => "Literatura Portuguesa",
        "macs" => "Matemática Aplicada às Ciências Sociais",
        "matematica_b" => "Matemática B",
        "historia_cultura_artes" => "História da Cultura e das Artes",
        "biologia" => "Biologia",
        "fisica" => "Física",
        "quimica" => "Química",
        "geologia" => "Geologia",
        "economia_c" => "Economia C",
        "geografia_c" => "Geografia C",
        "sociologia" => "Sociologia",
        "filosofia_a" => "Filosofia A",
        "latim_b" => "Latim B",
        "literaturas_lingua_portuguesa" => "Literaturas de Língua Portuguesa",
        "oficina_artes" => "Oficina de Artes",
        "oficina_multimedia_b" => "Oficina de Multimédia B",
        "materiais_tecnologias" => "Materiais e Tecnologias",
        "aplicacoes_informaticas_b" => "Aplicações Informáticas B",
        "psicologia_b" => "Psicologia B",
        "direito" => "Direito",
        "ciencia_politica" => "Ciência Política",
        _ => return None,
    };
    Some(name)
}

/// How many school years the subject spans, where the slug pins it down.
pub fn subject_duration_years(slug: &str) -> Option<u8> {
    match slug {
        "portugues" | "educacao_fisica" => Some(3),
        "filosofia" | "ingles" | "frances" | "alemao" | "espanhol" => Some(2),
        "emrc" => Some(1),
        _ => {
            for c in all_courses() {
                if c.trienal == slug {
                    return Some(3);
                }
                if c.bienal_pool.contains(&slug) {
                    return Some(2);
                }
                if c.anual_primary_pool.contains(&slug) {
                    return Some(1);
                }
            }
            if ANUAL_SECONDARY_POOL.contains(&slug) {
                return Some(1);
            }
            None
        }
    }
}

fn check_grade_level(grade_level: u8) -> Result<(), CalcError> {
    if !(10..=12).contains(&grade_level) {
        return Err(CalcError {
            code: "grade_level_out_of_range".to_string(),
            message: format!("secundário grade level {} outside 10..=12", grade_level),
            details: None,
        });
    }
    Ok(())
}

/// The subjects a student carries with no choice involved: the general
/// trunk plus the course's triennial. Foreign language and filosofia run
/// through 11.º only.
pub fn auto_slugs(
    course_key: CourseKey,
    grade_level: u8,
    language: LanguageKey,
) -> Result<Vec<&'static str>, CalcError> {
    check_grade_level(grade_level)?;
    let def = course(course_key);
    let mut slugs = vec!["portugues"];
    if grade_level <= 11 {
        slugs.push(language.slug());
        slugs.push("filosofia");
    }
    slugs.push("educacao_fisica");
    slugs.push(def.trienal);
    Ok(slugs)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCurriculum {
    pub slugs: Vec<String>,
    /// Selections that do not apply at this grade or are not in any pool.
    /// Reported back, never silently corrected.
    pub ignored: Vec<String>,
}

/// Full subject list for one student-year: the automatic trunk plus the
/// choices that apply at this grade. Biennial electives run 10.º-11.º;
/// annual options exist only in 12.º.
pub fn resolve_selected_slugs(
    course_key: CourseKey,
    grade_level: u8,
    language: LanguageKey,
    bienais: &[String],
    anuais: &[String],
    include_emrc: bool,
) -> Result<ResolvedCurriculum, CalcError> {
    let mut slugs: Vec<String> = auto_slugs(course_key, grade_level, language)?
        .into_iter()
        .map(str::to_string)
        .collect();
    let def = course(course_key);
    let mut ignored = Vec::new();

    for b in bienais {
        if grade_level <= 11 && def.bienal_pool.contains(&b.as_str()) {
            slugs.push(b.clone());
        } else {
            ignored.push(b.clone());
        }
    }
    for a in anuais {
        let known = def.anual_primary_pool.contains(&a.as_str())
            || ANUAL_SECONDARY_POOL.contains(&a.as_str());
        if grade_level == 12 && known {
            slugs.push(a.clone());
        } else {
            ignored.push(a.clone());
        }
    }
    if include_emrc {
        slugs.push("emrc".to_string());
    }

    Ok(ResolvedCurriculum { slugs, ignored })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnuaisValidation {
    pub valid: bool,
    pub count_from_primary_pool: usize,
    pub unknown: Vec<String>,
}

/// 12.º ano rule: exactly two annual options, at least one from the
/// course's own opção D pool. A pair drawn entirely from the transversal
/// pool is reported invalid with a primary count of zero.
pub fn validate_anuais_selection(course_key: CourseKey, choices: &[String]) -> AnuaisValidation {
    let def = course(course_key);
    let mut from_primary = 0usize;
    let mut unknown = Vec::new();
    for c in choices {
        if def.anual_primary_pool.contains(&c.as_str()) {
            from_primary += 1;
        } else if !ANUAL_SECONDARY_POOL.contains(&c.as_str()) {
            unknown.push(c.clone());
        }
    }
    AnuaisValidation {
        valid: choices.len() == 2 && unknown.is_empty() && from_primary >= 1,
        count_from_primary_pool: from_primary,
        unknown,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BienaisValidation {
    pub valid: bool,
    pub unknown: Vec<String>,
}

/// Exactly two biennial electives, both from the course's pool.
pub fn validate_bienais_selection(course_key: CourseKey, choices: &[String]) -> BienaisValidation {
    let def = course(course_key);
    let unknown: Vec<String> = choices
        .iter()
        .filter(|c| !def.bienal_pool.contains(&c.as_str()))
        .cloned()
        .collect();
    BienaisValidation {
        valid: choices.len() == 2 && unknown.is_empty(),
        unknown,
    }
}
