use serde::Serialize;

use super::domain::{AnswerSet, OrganizationType, QuestionId, NONE_OPTION, UNKNOWN_OPTION};

/// Shape of the answer a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerType {
    Ternary,
    MultiSelect { options: &'static [&'static str] },
}

/// Named visibility predicates evaluated against the full current answer set.
///
/// An unanswered referenced question never satisfies a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Always,
    /// Organization answered as public or unknown.
    PublicOrUnknownOrganization,
    /// Private or unknown organization, or public with both public subtypes answered no.
    EstablishmentRelevant,
    /// Establishment route is open and the organization has a Swedish establishment.
    SwedishEstablishment,
    /// Swedish establishment plus at least one NIS2 industry or digital service selected.
    SectorSelected,
    /// Either the public direct route or the Swedish establishment route applies.
    CoverageRouteOpen,
    /// At least one exemption question was answered yes.
    ExemptionClaimed,
}

impl Visibility {
    pub fn evaluate(self, answers: &AnswerSet) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::PublicOrUnknownOrganization => public_or_unknown(answers),
            Visibility::EstablishmentRelevant => establishment_route_open(answers),
            Visibility::SwedishEstablishment => has_swedish_establishment(answers),
            Visibility::SectorSelected => {
                has_swedish_establishment(answers)
                    && (answers.has_selections(QuestionId::Nis2Industries)
                        || answers.has_selections(QuestionId::DigitalServices))
            }
            Visibility::CoverageRouteOpen => {
                public_direct_coverage(answers) || has_swedish_establishment(answers)
            }
            Visibility::ExemptionClaimed => EXEMPTION_QUESTIONS
                .iter()
                .any(|id| answers.is_yes(*id)),
        }
    }

    /// Question ids the predicate reads.
    pub fn references(self) -> &'static [QuestionId] {
        const ORGANIZATION: &[QuestionId] = &[QuestionId::PublicSectorEntity];
        const ESTABLISHMENT_ROUTE: &[QuestionId] = &[
            QuestionId::PublicSectorEntity,
            QuestionId::CentralGovernmentCrossBorder,
            QuestionId::MunicipalOrRegional,
        ];
        const ESTABLISHMENT: &[QuestionId] = &[
            QuestionId::PublicSectorEntity,
            QuestionId::CentralGovernmentCrossBorder,
            QuestionId::MunicipalOrRegional,
            QuestionId::SwedishEstablishment,
        ];
        const SECTOR: &[QuestionId] = &[
            QuestionId::PublicSectorEntity,
            QuestionId::CentralGovernmentCrossBorder,
            QuestionId::MunicipalOrRegional,
            QuestionId::SwedishEstablishment,
            QuestionId::Nis2Industries,
            QuestionId::DigitalServices,
        ];

        match self {
            Visibility::Always => &[],
            Visibility::PublicOrUnknownOrganization => ORGANIZATION,
            Visibility::EstablishmentRelevant => ESTABLISHMENT_ROUTE,
            Visibility::SwedishEstablishment | Visibility::CoverageRouteOpen => ESTABLISHMENT,
            Visibility::SectorSelected => SECTOR,
            Visibility::ExemptionClaimed => &EXEMPTION_QUESTIONS,
        }
    }
}

/// The four exemption questions that are relevant whenever a coverage route is open.
pub const EXEMPTION_QUESTIONS: [QuestionId; 4] = [
    QuestionId::SecuritySensitiveActivity,
    QuestionId::PrivateSecuritySensitiveOnly,
    QuestionId::ExcludedGovernmentBody,
    QuestionId::ExcludedAssembly,
];

/// Organization is public or its type is unknown.
pub(crate) fn public_or_unknown(answers: &AnswerSet) -> bool {
    matches!(
        answers.organization_type(),
        OrganizationType::Public | OrganizationType::Unknown
    )
}

/// Organization is public and both public subtype questions were answered no.
pub(crate) fn public_without_subtype(answers: &AnswerSet) -> bool {
    answers.organization_type() == OrganizationType::Public
        && answers.is_no(QuestionId::CentralGovernmentCrossBorder)
        && answers.is_no(QuestionId::MunicipalOrRegional)
}

pub(crate) fn establishment_route_open(answers: &AnswerSet) -> bool {
    matches!(
        answers.organization_type(),
        OrganizationType::Private | OrganizationType::Unknown
    ) || public_without_subtype(answers)
}

pub(crate) fn public_direct_coverage(answers: &AnswerSet) -> bool {
    public_or_unknown(answers)
        && (answers.is_yes(QuestionId::CentralGovernmentCrossBorder)
            || answers.is_yes(QuestionId::MunicipalOrRegional))
}

pub(crate) fn has_swedish_establishment(answers: &AnswerSet) -> bool {
    establishment_route_open(answers) && answers.is_yes(QuestionId::SwedishEstablishment)
}

/// Static declaration of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub section: u8,
    pub prompt: &'static str,
    pub help_text: &'static str,
    pub answer_type: AnswerType,
    pub visibility: Visibility,
}

impl Question {
    pub fn is_visible(&self, answers: &AnswerSet) -> bool {
        self.visibility.evaluate(answers)
    }

    pub fn is_multi_select(&self) -> bool {
        matches!(self.answer_type, AnswerType::MultiSelect { .. })
    }
}

pub const NIS2_INDUSTRY_OPTIONS: &[&str] = &[
    "energy",
    "transport",
    "banking",
    "financial_market_infrastructure",
    "health",
    "drinking_water",
    "waste_water",
    "digital_infrastructure",
    "ict_service_management",
    "public_administration",
    "space",
    "postal_and_courier",
    "waste_management",
    "chemicals",
    "food",
    "manufacturing",
    "research",
    UNKNOWN_OPTION,
    NONE_OPTION,
];

pub const DIGITAL_SERVICE_OPTIONS: &[&str] = &[
    "online_marketplace",
    "online_search_engine",
    "social_networking_platform",
    "cloud_computing",
    "data_centre",
    "content_delivery_network",
    "dns_service",
    "tld_registry",
    "domain_registration",
    "managed_services",
    "managed_security_services",
    UNKNOWN_OPTION,
    NONE_OPTION,
];

const SECTION_TITLES: [&str; 4] = [
    "Organization type",
    "Establishment and activities",
    "Exemptions",
    "Trusted services",
];

/// Display title for a section number (1-based).
pub fn section_title(section: u8) -> Option<&'static str> {
    SECTION_TITLES.get(usize::from(section).checked_sub(1)?).copied()
}

static QUESTIONS: [Question; 18] = [
    Question {
        id: QuestionId::PublicSectorEntity,
        section: 1,
        prompt: "Is your organization a public sector entity?",
        help_text: "Government agencies, municipalities, regions and their administrations are public sector entities. Companies, foundations and associations are private.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::Always,
    },
    Question {
        id: QuestionId::CentralGovernmentCrossBorder,
        section: 1,
        prompt: "Is your organization a central government authority whose activities can have cross-border impact?",
        help_text: "Central government authorities are covered directly when their services affect other EU member states.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::PublicOrUnknownOrganization,
    },
    Question {
        id: QuestionId::MunicipalOrRegional,
        section: 1,
        prompt: "Is your organization a municipality or a region?",
        help_text: "Municipalities and regions are covered directly regardless of size.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::PublicOrUnknownOrganization,
    },
    Question {
        id: QuestionId::SwedishEstablishment,
        section: 2,
        prompt: "Does your organization have its main establishment in Sweden?",
        help_text: "The main establishment is where decisions on cybersecurity risk management are predominantly taken.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::EstablishmentRelevant,
    },
    Question {
        id: QuestionId::TrustedServicesProvider,
        section: 2,
        prompt: "Does your organization provide trust services, such as electronic identification or electronic signatures?",
        help_text: "Qualified and non-qualified trust service providers under the eIDAS regulation are always covered.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SwedishEstablishment,
    },
    Question {
        id: QuestionId::Nis2Industries,
        section: 2,
        prompt: "Which of the following sectors does your organization operate in?",
        help_text: "Select every sector listed in the annexes of the NIS2 directive that applies, or \"none\".",
        answer_type: AnswerType::MultiSelect {
            options: NIS2_INDUSTRY_OPTIONS,
        },
        visibility: Visibility::SwedishEstablishment,
    },
    Question {
        id: QuestionId::DigitalServices,
        section: 2,
        prompt: "Does your organization provide any of the following digital services?",
        help_text: "Digital infrastructure and digital provider services are covered in several cases regardless of size.",
        answer_type: AnswerType::MultiSelect {
            options: DIGITAL_SERVICE_OPTIONS,
        },
        visibility: Visibility::SwedishEstablishment,
    },
    Question {
        id: QuestionId::TelecomProvider,
        section: 2,
        prompt: "Does your organization provide public electronic communications networks or publicly available electronic communications services?",
        help_text: "Providers of public electronic communications are covered regardless of size.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SwedishEstablishment,
    },
    Question {
        id: QuestionId::PrivateEducationProvider,
        section: 2,
        prompt: "Is your organization a private provider of education?",
        help_text: "Private education providers carrying out particularly critical research or teaching activities may be covered.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SwedishEstablishment,
    },
    Question {
        id: QuestionId::MediumOrLargeEnterprise,
        section: 2,
        prompt: "Does your organization have at least 50 employees, or an annual turnover or balance sheet total above EUR 10 million?",
        help_text: "Medium-sized and large enterprises in the listed sectors are covered.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SectorSelected,
    },
    Question {
        id: QuestionId::SoleProviderCriticalService,
        section: 2,
        prompt: "Is your organization the sole provider in Sweden of a service essential to critical societal or economic activities?",
        help_text: "Sole providers are covered regardless of size.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SectorSelected,
    },
    Question {
        id: QuestionId::SevereDisruptionImpact,
        section: 2,
        prompt: "Could a disruption of your services have a significant impact on public safety, public security or public health?",
        help_text: "Entities whose disruption could cause significant systemic risk are covered regardless of size.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SectorSelected,
    },
    Question {
        id: QuestionId::NationallySignificant,
        section: 2,
        prompt: "Is your organization of particular importance at national or regional level for a sector or type of service?",
        help_text: "Critical entities under the CER directive and entities of specific national importance are covered regardless of size.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::SectorSelected,
    },
    Question {
        id: QuestionId::SecuritySensitiveActivity,
        section: 3,
        prompt: "Does your organization mainly carry out activities in national security, public security, defence or law enforcement?",
        help_text: "Public bodies mainly carrying out such activities are excluded from the act.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::CoverageRouteOpen,
    },
    Question {
        id: QuestionId::PrivateSecuritySensitiveOnly,
        section: 3,
        prompt: "Does your organization only provide services to public bodies carrying out security-sensitive activities?",
        help_text: "Entities that exclusively serve such public bodies may be excluded.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::CoverageRouteOpen,
    },
    Question {
        id: QuestionId::ExcludedGovernmentBody,
        section: 3,
        prompt: "Is your organization the Government Offices, the Riksbank or a court?",
        help_text: "These bodies are excluded from the act.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::CoverageRouteOpen,
    },
    Question {
        id: QuestionId::ExcludedAssembly,
        section: 3,
        prompt: "Is your organization the Riksdag or one of its authorities?",
        help_text: "The parliament and its authorities are excluded from the act.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::CoverageRouteOpen,
    },
    Question {
        id: QuestionId::TrustedServicesUnderExemption,
        section: 4,
        prompt: "Does your organization nevertheless provide trust services?",
        help_text: "Trust service providers are covered even when an exemption would otherwise apply.",
        answer_type: AnswerType::Ternary,
        visibility: Visibility::ExemptionClaimed,
    },
];

/// Every question in canonical declaration order.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn question(id: QuestionId) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.id == id)
}

/// Declaration index of a question; the stable ordering key for visibility.
pub fn declaration_index(id: QuestionId) -> Option<usize> {
    QUESTIONS.iter().position(|question| question.id == id)
}
