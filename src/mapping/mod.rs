//! Mapping of amoCRM enumerations to platform vocabulary.
//!
//! The tables are hand-curated and exact-match only: an unknown enum id is a
//! hard mapping failure, never a default. They are built once at startup from
//! [`Settings`] and passed by reference wherever a lookup is needed.

pub mod payload;

pub use payload::{split_name, PaymentPayloadMapper};

use std::collections::HashMap;

use crate::error::{ProcessError, Result};
use crate::settings::Settings;

/// Read-only lookup tables for subject, class and course enumerations.
pub struct EnumTables {
    subjects: HashMap<u64, &'static str>,
    subject_names: HashMap<u64, &'static str>,
    classes: HashMap<u64, u8>,
    courses: HashMap<u64, &'static str>,
}

impl EnumTables {
    pub fn new(settings: &Settings) -> Self {
        let subjects = HashMap::from([
            (settings.subject_obshchestvo, "social"),
            (settings.subject_english, "english"),
            (settings.subject_history, "history"),
            (settings.subject_russian, "russian"),
            (settings.subject_physics, "physics"),
            (settings.subject_chemistry, "chemistry"),
            (settings.subject_literature, "literature"),
            (settings.subject_math_prof_masha, "maths"),
            (settings.subject_math_base, "maths-base"),
            (settings.subject_biology_zhenya, "biology"),
            (settings.subject_informatics, "informatics"),
            (settings.subject_math_prof_sasha, "maths2"),
            (settings.subject_biology_gelya, "biology2"),
            (settings.subject_math_7_8, "middle_math"),
            (settings.subject_math_oge, "maths-oge"),
        ]);

        let subject_names = HashMap::from([
            (settings.subject_obshchestvo, "Обществознание"),
            (settings.subject_english, "Английский язык"),
            (settings.subject_history, "История"),
            (settings.subject_russian, "Русский"),
            (settings.subject_physics, "Физика"),
            (settings.subject_chemistry, "Химия"),
            (settings.subject_literature, "Литература"),
            (settings.subject_math_prof_masha, "Профиль Маша"),
            (settings.subject_math_base, "База матем"),
            (settings.subject_biology_zhenya, "Биология Женя"),
            (settings.subject_informatics, "Информатика"),
            (settings.subject_math_prof_sasha, "Профиль Саша"),
            (settings.subject_biology_gelya, "Биология Геля"),
            (settings.subject_math_7_8, "Математика 7-8 класс"),
            (settings.subject_math_oge, "Математика ОГЭ"),
        ]);

        // "Younger than 9th", "university" and "not a student" are deliberate
        // compressions onto the platform's 1-11 scale.
        let classes = HashMap::from([
            (settings.class_5_6, 6),
            (settings.class_7, 7),
            (settings.class_8, 8),
            (settings.class_9, 9),
            (settings.class_10, 10),
            (settings.class_11, 11),
            (settings.class_younger_9, 8),
            (settings.class_university, 11),
            (settings.class_not_student, 11),
        ]);

        let courses = HashMap::from([
            (settings.course_all_myself, "Все сам"),
            (settings.course_comfortik, "Комфортик"),
            (settings.course_na_maksimalkah, "На максималках"),
            (settings.course_polugodovoy_oge, "Полугодовой ОГЭ"),
            (settings.course_normis, "Нормис"),
            (settings.course_imba, "Имба"),
            (settings.course_spetskurs, "Спецкурс"),
            (settings.course_nu_norm, "Ну норм"),
            (settings.course_syn_maminoy_podruge, "Сын маминой подруги"),
            (settings.course_prohodka_na_byudzhet, "Проходка на бюджет"),
            (settings.course_shik_blesk, "Шик блеск"),
            (settings.course_standart, "Стандарт"),
            (settings.course_samostoyatelnyy, "Самостоятельный"),
            (settings.course_platinum, "Платинум"),
        ]);

        Self {
            subjects,
            subject_names,
            classes,
            courses,
        }
    }

    /// Platform `subject_designation` for a subject enum id.
    pub fn subject_designation(&self, subject_id: u64) -> Result<&'static str> {
        self.subjects.get(&subject_id).copied().ok_or_else(|| {
            let label = match self.subject_names.get(&subject_id) {
                Some(name) => format!("'{name}' (ID: {subject_id})"),
                None => format!("ID {subject_id}"),
            };
            ProcessError::SubjectMappingNotFound(label)
        })
    }

    /// Human display name of a subject, for logs and error messages.
    pub fn subject_name(&self, subject_id: u64) -> Option<&'static str> {
        self.subject_names.get(&subject_id).copied()
    }

    /// Numeric school class (1-11) for a class enum id.
    pub fn class_number(&self, class_id: u64) -> Result<u8> {
        self.classes
            .get(&class_id)
            .copied()
            .ok_or(ProcessError::ClassMappingNotFound(class_id))
    }

    /// Display name for a purchased-course enum id.
    pub fn course_name(&self, course_id: u64) -> Result<&'static str> {
        self.courses
            .get(&course_id)
            .copied()
            .ok_or(ProcessError::CourseMappingNotFound(course_id))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
