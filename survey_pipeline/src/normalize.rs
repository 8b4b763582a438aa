//! Category normalization: exact-string mapping of known free-text answers
//! to the fixed vocabularies, with the `Unknown` sentinel as the total
//! fallback. Substring or fuzzy matching is deliberately not offered, it
//! silently misclassifies answers containing negations.

use std::collections::HashMap;

use log::debug;

use crate::model::*;

/// An exact-string lookup table from known full-sentence survey answers to
/// a category. The input is trimmed before lookup. Misses, including empty
/// and whitespace-only text, return the map's `Unknown` variant: the mapping
/// is total and never drops a row.
#[derive(Debug, Clone)]
pub struct CategoryMap<C> {
    entries: HashMap<String, C>,
    unknown: C,
}

impl<C: Copy + std::fmt::Debug> CategoryMap<C> {
    pub fn new(unknown: C) -> CategoryMap<C> {
        CategoryMap {
            entries: HashMap::new(),
            unknown,
        }
    }

    pub fn from_entries(entries: &[(&str, C)], unknown: C) -> CategoryMap<C> {
        let mut res = CategoryMap::new(unknown);
        for (sentence, category) in entries {
            res.insert(sentence, *category);
        }
        res
    }

    pub fn insert(&mut self, sentence: &str, category: C) {
        self.entries.insert(sentence.trim().to_string(), category);
    }

    pub fn normalize(&self, text: &str) -> C {
        let t = text.trim();
        if t.is_empty() {
            return self.unknown;
        }
        match self.entries.get(t) {
            Some(category) => *category,
            None => {
                debug!(
                    "normalize: unmapped answer {:?}, falling back to {:?}",
                    t, self.unknown
                );
                self.unknown
            }
        }
    }

    pub fn unknown(&self) -> C {
        self.unknown
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three category maps plus the known role vocabulary.
#[derive(Debug, Clone)]
pub struct SurveyMappings {
    pub fulfillment: CategoryMap<Fulfillment>,
    pub recognition: CategoryMap<Recognition>,
    pub growth: CategoryMap<Growth>,
    pub roles: Vec<String>,
}

impl SurveyMappings {
    /// The built-in vocabulary of the Homes First workbook: the full answer
    /// sentences and their single-word short forms.
    pub fn defaults() -> SurveyMappings {
        let fulfillment = CategoryMap::from_entries(
            &[
                (
                    "I find the work I do extremely fulfilling and rewarding",
                    Fulfillment::High,
                ),
                (
                    "I find the work I do moderately fulfilling and rewarding",
                    Fulfillment::Medium,
                ),
                (
                    "I find the work I do somewhat fulfilling and rewarding",
                    Fulfillment::Medium,
                ),
                (
                    "I find the work I do slightly fulfilling and rewarding",
                    Fulfillment::Low,
                ),
                (
                    "I do not find the work I do fulfilling and rewarding",
                    Fulfillment::Low,
                ),
                ("Extremely", Fulfillment::High),
                ("Moderately", Fulfillment::Medium),
                ("Somewhat", Fulfillment::Medium),
                ("Slightly", Fulfillment::Low),
                ("Not at all", Fulfillment::Low),
            ],
            Fulfillment::Unknown,
        );
        let recognition = CategoryMap::from_entries(
            &[
                (
                    "Yes, I feel acknowledged and recognized for my contribution",
                    Recognition::Yes,
                ),
                (
                    "Somewhat acknowledged and recognized",
                    Recognition::Somewhat,
                ),
                ("Rarely acknowledged or recognized", Recognition::Rare),
                (
                    "No, and I would like more recognition",
                    Recognition::NoWantMore,
                ),
                ("No, but I prefer it that way", Recognition::NoPrefer),
                ("Yes", Recognition::Yes),
                ("Somewhat", Recognition::Somewhat),
                ("Rarely", Recognition::Rare),
                ("No", Recognition::NoWantMore),
            ],
            Recognition::Unknown,
        );
        let growth = CategoryMap::from_entries(
            &[
                (
                    "Yes, I see potential for growth at Homes First",
                    Growth::Yes,
                ),
                ("Some potential for growth", Growth::Some),
                ("Limited potential for growth", Growth::Limited),
                ("Very limited potential for growth", Growth::VeryLimited),
                (
                    "I am not interested in growth opportunities",
                    Growth::NotInterested,
                ),
                ("Yes", Growth::Yes),
                ("Some", Growth::Some),
                ("Limited", Growth::Limited),
                ("Very limited", Growth::VeryLimited),
                ("Not interested", Growth::NotInterested),
            ],
            Growth::Unknown,
        );
        let roles = [
            "Coordinator",
            "Case Manager",
            "Housing Worker",
            "Shelter Worker",
            "Supervisor",
            "Manager",
            "Administration",
            "Relief Staff",
            "Maintenance",
        ]
        .iter()
        .map(|r| r.to_string())
        .collect();
        SurveyMappings {
            fulfillment,
            recognition,
            growth,
            roles,
        }
    }

    /// The raw role if it is in the known vocabulary (case-insensitive),
    /// [OTHER_ROLE] otherwise.
    pub fn validate_role(&self, raw: &str) -> String {
        let t = raw.trim();
        match self
            .roles
            .iter()
            .find(|r| r.eq_ignore_ascii_case(t))
        {
            Some(role) => role.clone(),
            None => {
                if !t.is_empty() {
                    debug!("validate_role: unknown role {:?}", t);
                }
                OTHER_ROLE.to_string()
            }
        }
    }
}

/// Applies the category maps, validates the role and derives the score band
/// for every record. Total: the output has exactly one row per input row.
pub fn normalize_records(
    records: &[SurveyRecord],
    mappings: &SurveyMappings,
) -> Vec<NormalizedRecord> {
    records
        .iter()
        .map(|r| NormalizedRecord {
            id: r.id.clone(),
            role_raw: r.role.clone(),
            role: mappings.validate_role(&r.role),
            ethnicity_raw: r.ethnicity_raw.clone(),
            disability_raw: r.disability_raw.clone(),
            fulfillment_text: r.fulfillment_text.clone(),
            recognition_text: r.recognition_text.clone(),
            growth_text: r.growth_text.clone(),
            recommendation_score: r.recommendation_score,
            fulfillment: mappings.fulfillment.normalize(&r.fulfillment_text),
            recognition: mappings.recognition.normalize(&r.recognition_text),
            growth: mappings.growth.normalize(&r.growth_text),
            score_band: r.recommendation_score.map(ScoreBand::from_score),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fulfillment_text: &str, score: Option<u8>) -> SurveyRecord {
        SurveyRecord {
            id: "t-00000002".to_string(),
            role: "Coordinator".to_string(),
            ethnicity_raw: "Black".to_string(),
            disability_raw: "".to_string(),
            fulfillment_text: fulfillment_text.to_string(),
            recognition_text: "Yes".to_string(),
            growth_text: "Some potential for growth".to_string(),
            recommendation_score: score,
        }
    }

    #[test]
    fn known_sentence_maps_to_category() {
        let mappings = SurveyMappings::defaults();
        let recs = normalize_records(
            &[record(
                "I find the work I do extremely fulfilling and rewarding",
                Some(9),
            )],
            &mappings,
        );
        assert_eq!(recs[0].fulfillment, Fulfillment::High);
        assert_eq!(recs[0].recognition, Recognition::Yes);
        assert_eq!(recs[0].growth, Growth::Some);
        assert_eq!(recs[0].score_band, Some(ScoreBand::Promoter9To10));
    }

    #[test]
    fn unmapped_text_degrades_to_unknown_and_keeps_the_row() {
        let mappings = SurveyMappings::defaults();
        let recs = normalize_records(&[record("garbled OCR text", None)], &mappings);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].fulfillment, Fulfillment::Unknown);
        assert_eq!(recs[0].score_band, None);
    }

    #[test]
    fn mapping_is_total_over_arbitrary_strings() {
        let mappings = SurveyMappings::defaults();
        for s in ["", "   ", "\t\n", "yes!!", "EXTREMELY", "high", "42"] {
            let c = mappings.fulfillment.normalize(s);
            assert!(Fulfillment::ALL.contains(&c), "normalize({:?}) = {:?}", s, c);
        }
    }

    #[test]
    fn lookup_trims_but_does_not_substring_match() {
        let mappings = SurveyMappings::defaults();
        assert_eq!(
            mappings.fulfillment.normalize("  Extremely  "),
            Fulfillment::High
        );
        // A negated sentence that merely contains a known keyword must not
        // be reclassified.
        assert_eq!(
            mappings
                .fulfillment
                .normalize("I don't find the work I do extremely fulfilling and rewarding at all"),
            Fulfillment::Unknown
        );
    }

    #[test]
    fn role_validation_falls_back_to_other() {
        let mappings = SurveyMappings::defaults();
        assert_eq!(mappings.validate_role("case manager"), "Case Manager");
        assert_eq!(mappings.validate_role("  Coordinator "), "Coordinator");
        assert_eq!(mappings.validate_role("Astronaut"), OTHER_ROLE);
        assert_eq!(mappings.validate_role(""), OTHER_ROLE);
    }

    #[test]
    fn score_band_edges() {
        assert_eq!(ScoreBand::from_score(0).label(), "0-3");
        assert_eq!(ScoreBand::from_score(3).label(), "0-3");
        assert_eq!(ScoreBand::from_score(4).label(), "4-6");
        assert_eq!(ScoreBand::from_score(6).label(), "4-6");
        assert_eq!(ScoreBand::from_score(7).label(), "7-8");
        assert_eq!(ScoreBand::from_score(8).label(), "7-8");
        assert_eq!(ScoreBand::from_score(9).label(), "9-10");
        assert_eq!(ScoreBand::from_score(10).label(), "9-10");
    }

    #[test]
    fn ordinal_tables_are_separate_from_text_maps() {
        assert_eq!(Fulfillment::High.ordinal(), Some(3));
        assert_eq!(Fulfillment::Unknown.ordinal(), None);
        assert_eq!(Recognition::NoPrefer.ordinal(), Some(0));
        assert_eq!(Recognition::Unknown.ordinal(), None);
        assert_eq!(Growth::Yes.ordinal(), Some(4));
        assert_eq!(Growth::Unknown.ordinal(), None);
    }
}
