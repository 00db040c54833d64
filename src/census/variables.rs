// ACS variable groups.
// Each group lists variable codes with display labels; the first entry is the group's total.

/// A census variable code and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub code: &'static str,
    pub label: &'static str,
}

const fn var(code: &'static str, label: &'static str) -> Variable {
    Variable { code, label }
}

/// Named sets of ACS variables fetched together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableGroup {
    /// C16001: language spoken at home, collapsed categories.
    Language,
    /// B16001: language spoken at home, detailed categories.
    DetailedLanguage,
    /// B19058: public assistance income or food stamps/SNAP.
    PublicAssistance,
    /// B17026: ratio of income to poverty level.
    PovertyLevel,
    /// B01003: total population.
    TotalPopulation,
}

/// Groups fetched in the single county-level download.
pub const COUNTY_GROUPS: [VariableGroup; 4] = [
    VariableGroup::Language,
    VariableGroup::PublicAssistance,
    VariableGroup::PovertyLevel,
    VariableGroup::TotalPopulation,
];

impl VariableGroup {
    /// Stable identifier used in cache keys.
    pub fn slug(&self) -> &'static str {
        match self {
            VariableGroup::Language => "language",
            VariableGroup::DetailedLanguage => "detailed_language",
            VariableGroup::PublicAssistance => "public_assistance",
            VariableGroup::PovertyLevel => "poverty_level",
            VariableGroup::TotalPopulation => "total_population",
        }
    }

    pub fn variables(&self) -> &'static [Variable] {
        match self {
            VariableGroup::Language => LANGUAGE,
            VariableGroup::DetailedLanguage => DETAILED_LANGUAGE,
            VariableGroup::PublicAssistance => PUBLIC_ASSISTANCE,
            VariableGroup::PovertyLevel => POVERTY_LEVEL,
            VariableGroup::TotalPopulation => TOTAL_POPULATION,
        }
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.variables().iter().map(|v| v.code).collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.variables().iter().map(|v| v.label).collect()
    }
}

static LANGUAGE: &[Variable] = &[
    var("C16001_001E", "total speakers"),
    var("C16001_005E", "spanish speakers"),
    var("C16001_020E", "korean speakers"),
    var("C16001_026E", "vietnamese speakers"),
    var("C16001_035E", "arabic speakers"),
    var("C16001_023E", "chinese (incl. mandarin, cantonese) speakers"),
    var("C16001_008E", "french, haitian, or cajun speakers"),
    var("C16001_011E", "german or other west germanic languages speakers"),
    var("C16001_014E", "russian, polish, or other slavic languages speakers"),
    var("C16001_017E", "other indo-european languages speakers"),
    var("C16001_029E", "tagalog (incl. filipino) speakers"),
    var("C16001_032E", "other asian and pacific island languages speakers"),
    var("C16001_038E", "other and unspecified languages speakers"),
];

static DETAILED_LANGUAGE: &[Variable] = &[
    var("B16001_001E", "total speakers"),
    var("B16001_005E", "spanish speakers"),
    var("B16001_008E", "french (incl. cajun) speakers"),
    var("B16001_011E", "haitian speakers"),
    var("B16001_014E", "italian speakers"),
    var("B16001_017E", "portuguese speakers"),
    var("B16001_020E", "german speakers"),
    var(
        "B16001_023E",
        "yiddish, pennsylvania dutch or other west germanic languages speakers",
    ),
    var("B16001_026E", "greek speakers"),
    var("B16001_029E", "russian speakers"),
    var("B16001_032E", "polish speakers"),
    var("B16001_035E", "serbo-croatian speakers"),
    var("B16001_038E", "ukrainian or other slavic languages speakers"),
    var("B16001_041E", "armenian speakers"),
    var("B16001_044E", "persian (incl. farsi, dari) speakers"),
    var("B16001_047E", "gujarati speakers"),
    var("B16001_050E", "hindi speakers"),
    var("B16001_053E", "urdu speakers"),
    var("B16001_056E", "punjabi speakers"),
    var("B16001_059E", "bengali speakers"),
    var("B16001_062E", "nepali, marathi, or other indic languages speakers"),
    var("B16001_065E", "other indo-european languages speakers"),
    var("B16001_068E", "telugu speakers"),
    var("B16001_071E", "tamil speakers"),
    var("B16001_074E", "malayalam, kannada, or other dravidian languages speakers"),
    var("B16001_077E", "chinese (incl. mandarin, cantonese) speakers"),
    var("B16001_080E", "japanese speakers"),
    var("B16001_083E", "korean speakers"),
    var("B16001_086E", "hmong speakers"),
    var("B16001_089E", "vietnamese speakers"),
    var("B16001_092E", "khmer speakers"),
    var("B16001_095E", "thai, lao, or other tai-kadai languages speakers"),
    var("B16001_098E", "other languages of asia speakers"),
    var("B16001_101E", "tagalog (incl. filipino) speakers"),
    var(
        "B16001_104E",
        "ilocano, samoan, hawaiian, or other austronesian languages speakers",
    ),
    var("B16001_107E", "arabic speakers"),
    var("B16001_110E", "hebrew speakers"),
    var("B16001_113E", "amharic, somali, or other afro-asiatic languages speakers"),
    var(
        "B16001_116E",
        "yoruba, twi, igbo, or other languages of western africa speakers",
    ),
    var(
        "B16001_119E",
        "swahili or other languages of central, eastern, and southern africa speakers",
    ),
    var("B16001_122E", "navajo speakers"),
    var("B16001_125E", "other native languages of north america speakers"),
    var("B16001_128E", "other and unspecified languages speakers"),
];

static PUBLIC_ASSISTANCE: &[Variable] = &[
    var("B19058_001E", "total public assistance population"),
    var("B19058_002E", "received public assistance"),
];

static POVERTY_LEVEL: &[Variable] = &[
    var("B17026_001E", "total poverty"),
    var("B17026_002E", "under 0.5"),
    var("B17026_003E", "0.5 to 0.74"),
    var("B17026_004E", "0.75 to 0.99"),
    var("B17026_005E", "1.00 to 1.24"),
    var("B17026_006E", "1.25 to 1.49"),
    var("B17026_007E", "1.50 to 1.74"),
    var("B17026_008E", "1.75 to 1.84"),
];

static TOTAL_POPULATION: &[Variable] = &[var("B01003_001E", "total population")];
