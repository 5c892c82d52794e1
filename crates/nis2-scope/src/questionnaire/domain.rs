use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::{self, AnswerType};

/// Stable identifier for every question in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    PublicSectorEntity,
    CentralGovernmentCrossBorder,
    MunicipalOrRegional,
    SwedishEstablishment,
    TrustedServicesProvider,
    Nis2Industries,
    DigitalServices,
    TelecomProvider,
    PrivateEducationProvider,
    MediumOrLargeEnterprise,
    SoleProviderCriticalService,
    SevereDisruptionImpact,
    NationallySignificant,
    SecuritySensitiveActivity,
    PrivateSecuritySensitiveOnly,
    ExcludedGovernmentBody,
    ExcludedAssembly,
    TrustedServicesUnderExemption,
}

impl QuestionId {
    pub const ALL: [QuestionId; 18] = [
        QuestionId::PublicSectorEntity,
        QuestionId::CentralGovernmentCrossBorder,
        QuestionId::MunicipalOrRegional,
        QuestionId::SwedishEstablishment,
        QuestionId::TrustedServicesProvider,
        QuestionId::Nis2Industries,
        QuestionId::DigitalServices,
        QuestionId::TelecomProvider,
        QuestionId::PrivateEducationProvider,
        QuestionId::MediumOrLargeEnterprise,
        QuestionId::SoleProviderCriticalService,
        QuestionId::SevereDisruptionImpact,
        QuestionId::NationallySignificant,
        QuestionId::SecuritySensitiveActivity,
        QuestionId::PrivateSecuritySensitiveOnly,
        QuestionId::ExcludedGovernmentBody,
        QuestionId::ExcludedAssembly,
        QuestionId::TrustedServicesUnderExemption,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            QuestionId::PublicSectorEntity => "public_sector_entity",
            QuestionId::CentralGovernmentCrossBorder => "central_government_cross_border",
            QuestionId::MunicipalOrRegional => "municipal_or_regional",
            QuestionId::SwedishEstablishment => "swedish_establishment",
            QuestionId::TrustedServicesProvider => "trusted_services_provider",
            QuestionId::Nis2Industries => "nis2_industries",
            QuestionId::DigitalServices => "digital_services",
            QuestionId::TelecomProvider => "telecom_provider",
            QuestionId::PrivateEducationProvider => "private_education_provider",
            QuestionId::MediumOrLargeEnterprise => "medium_or_large_enterprise",
            QuestionId::SoleProviderCriticalService => "sole_provider_critical_service",
            QuestionId::SevereDisruptionImpact => "severe_disruption_impact",
            QuestionId::NationallySignificant => "nationally_significant",
            QuestionId::SecuritySensitiveActivity => "security_sensitive_activity",
            QuestionId::PrivateSecuritySensitiveOnly => "private_security_sensitive_only",
            QuestionId::ExcludedGovernmentBody => "excluded_government_body",
            QuestionId::ExcludedAssembly => "excluded_assembly",
            QuestionId::TrustedServicesUnderExemption => "trusted_services_under_exemption",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == token.trim())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized values for a yes/no/unknown question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ternary {
    Yes,
    No,
    Unknown,
}

impl Ternary {
    pub const fn token(self) -> &'static str {
        match self {
            Ternary::Yes => "yes",
            Ternary::No => "no",
            Ternary::Unknown => "unknown",
        }
    }

    /// Case-normalizing parse; anything outside the three tokens is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Ternary::Yes),
            "no" => Some(Ternary::No),
            "unknown" => Some(Ternary::Unknown),
            _ => None,
        }
    }
}

/// Multi-select option meaning "none of the above". Its presence nullifies other selections.
pub const NONE_OPTION: &str = "none";

/// Multi-select option recording that the respondent does not know.
pub const UNKNOWN_OPTION: &str = "unknown";

/// Raw answer as captured from the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(String),
    Selections(Vec<String>),
}

impl AnswerValue {
    pub fn choice(value: Ternary) -> Self {
        AnswerValue::Choice(value.token().to_string())
    }

    pub fn selections<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Selections(options.into_iter().map(Into::into).collect())
    }

    fn ternary(&self) -> Option<Ternary> {
        match self {
            AnswerValue::Choice(raw) => Ternary::parse(raw),
            AnswerValue::Selections(_) => None,
        }
    }

    fn real_selections(&self) -> impl Iterator<Item = &str> {
        let options: &[String] = match self {
            AnswerValue::Selections(options) => options,
            AnswerValue::Choice(_) => &[],
        };
        options
            .iter()
            .map(|option| option.trim())
            .filter(|option| {
                !option.eq_ignore_ascii_case(NONE_OPTION)
                    && !option.eq_ignore_ascii_case(UNKNOWN_OPTION)
            })
    }

    fn contains_option(&self, needle: &str) -> bool {
        match self {
            AnswerValue::Selections(options) => options
                .iter()
                .any(|option| option.trim().eq_ignore_ascii_case(needle)),
            AnswerValue::Choice(_) => false,
        }
    }

    fn has_selections(&self, known_options: &[&str]) -> bool {
        !self.contains_option(NONE_OPTION)
            && self.real_selections().any(|selected| {
                known_options
                    .iter()
                    .any(|option| option.eq_ignore_ascii_case(selected))
            })
    }

    fn is_explicit_unknown(&self) -> bool {
        match self {
            AnswerValue::Choice(raw) => Ternary::parse(raw) == Some(Ternary::Unknown),
            AnswerValue::Selections(_) => {
                !self.contains_option(NONE_OPTION)
                    && self.contains_option(UNKNOWN_OPTION)
                    && self.real_selections().next().is_none()
            }
        }
    }
}

/// Effective state of a single question when rules read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Yes,
    No,
    Unknown,
    /// A value is present but does not normalize to a recognized token.
    Unrecognized,
    Absent,
}

/// Organization classification derived from the public-sector question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    Public,
    Private,
    Unknown,
    Unanswered,
}

/// Answers collected for one questionnaire session.
///
/// Answers are monotonic: a key can be overwritten but never removed, even when the
/// question it belongs to becomes hidden again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, AnswerValue>",
    into = "BTreeMap<String, AnswerValue>"
)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: QuestionId, value: AnswerValue) -> Option<AnswerValue> {
        self.answers.insert(id, value)
    }

    pub fn with(mut self, id: QuestionId, value: Ternary) -> Self {
        self.insert(id, AnswerValue::choice(value));
        self
    }

    pub fn with_selections<I, S>(mut self, id: QuestionId, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(id, AnswerValue::selections(options));
        self
    }

    pub fn get(&self, id: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&id)
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.answers.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &AnswerValue)> {
        self.answers.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn state(&self, id: QuestionId) -> AnswerState {
        let Some(value) = self.answers.get(&id) else {
            return AnswerState::Absent;
        };

        if value.is_explicit_unknown() {
            return AnswerState::Unknown;
        }

        match value.ternary() {
            Some(Ternary::Yes) => AnswerState::Yes,
            Some(Ternary::No) => AnswerState::No,
            Some(Ternary::Unknown) => AnswerState::Unknown,
            None => AnswerState::Unrecognized,
        }
    }

    pub fn is_yes(&self, id: QuestionId) -> bool {
        self.state(id) == AnswerState::Yes
    }

    pub fn is_no(&self, id: QuestionId) -> bool {
        self.state(id) == AnswerState::No
    }

    /// True only for an explicit UNKNOWN answer; a missing key is not unknown.
    pub fn is_unknown(&self, id: QuestionId) -> bool {
        self.state(id) == AnswerState::Unknown
    }

    /// True when a multi-select holds a known option and not the "none" sentinel.
    ///
    /// Strings outside the question's option list never count as a selection.
    pub fn has_selections(&self, id: QuestionId) -> bool {
        let Some(AnswerType::MultiSelect { options }) =
            catalog::question(id).map(|question| question.answer_type)
        else {
            return false;
        };

        self.answers
            .get(&id)
            .map(|value| value.has_selections(options))
            .unwrap_or(false)
    }

    pub fn organization_type(&self) -> OrganizationType {
        match self.state(QuestionId::PublicSectorEntity) {
            AnswerState::Yes => OrganizationType::Public,
            AnswerState::No => OrganizationType::Private,
            AnswerState::Unknown => OrganizationType::Unknown,
            AnswerState::Unrecognized | AnswerState::Absent => OrganizationType::Unanswered,
        }
    }
}

impl From<BTreeMap<String, AnswerValue>> for AnswerSet {
    fn from(raw: BTreeMap<String, AnswerValue>) -> Self {
        let mut answers = BTreeMap::new();
        for (key, value) in raw {
            match QuestionId::from_token(&key) {
                Some(id) => {
                    answers.insert(id, value);
                }
                None => tracing::debug!(question = %key, "ignoring answer for unknown question"),
            }
        }
        Self { answers }
    }
}

impl From<AnswerSet> for BTreeMap<String, AnswerValue> {
    fn from(set: AnswerSet) -> Self {
        set.answers
            .into_iter()
            .map(|(id, value)| (id.as_str().to_string(), value))
            .collect()
    }
}

impl FromIterator<(QuestionId, AnswerValue)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, AnswerValue)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
