//! Country records and the built-in calling-code dataset.

use crate::error::DatasetError;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;

/// Where a country's flag glyph comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// A glyph rendered as-is, usually a regional-indicator emoji pair.
    Emoji(String),
    /// A text file whose first non-empty line is the glyph.
    Asset(PathBuf),
    #[default]
    Missing,
}

impl Flag {
    /// Regional-indicator emoji for an ISO 3166-1 alpha-2 code, e.g. `"VN"` -> 🇻🇳.
    pub fn from_iso(iso: &str) -> Self {
        let iso = iso.trim();
        if iso.len() != 2 || !iso.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Self::Missing;
        }
        let glyph: String = iso
            .bytes()
            .filter_map(|b| char::from_u32(0x1F1E6 + (b.to_ascii_uppercase() - b'A') as u32))
            .collect();
        Self::Emoji(glyph)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    /// Digits only, without the leading `+`.
    pub calling_code: String,
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub flag: Flag,
}

impl Country {
    pub fn new(name: impl Into<String>, calling_code: impl Into<String>, flag: Flag) -> Self {
        Self {
            name: name.into(),
            calling_code: calling_code.into(),
            iso_code: None,
            flag,
        }
    }

    /// Builds a record whose flag is derived from its ISO code.
    pub fn with_iso(
        name: impl Into<String>,
        iso_code: impl Into<String>,
        calling_code: impl Into<String>,
    ) -> Self {
        let iso_code = iso_code.into();
        Self {
            name: name.into(),
            calling_code: calling_code.into(),
            flag: Flag::from_iso(&iso_code),
            iso_code: Some(iso_code),
        }
    }

    /// List identity: two records with the same name and calling code are the same entry.
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.calling_code)
    }

    /// Calling code as displayed, e.g. `+84`.
    pub fn dial_prefix(&self) -> String {
        format!("+{}", self.calling_code)
    }
}

#[derive(Deserialize)]
struct Dataset {
    #[serde(default, rename = "country")]
    countries: Vec<Country>,
}

/// Parses a dataset of `[[country]]` tables.
///
/// Calling codes may be written with a leading `+`; it is stripped. Records with an ISO code
/// but no flag get the emoji flag for that code.
pub fn from_toml_str(s: &str) -> Result<Vec<Country>, DatasetError> {
    let dataset: Dataset = toml::from_str(s)?;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(dataset.countries.len());
    for (index, mut c) in dataset.countries.into_iter().enumerate() {
        c.name = c.name.trim().to_string();
        if c.name.is_empty() {
            return Err(DatasetError::EmptyName { index });
        }
        let code = c.calling_code.trim().trim_start_matches('+');
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DatasetError::InvalidCallingCode {
                name: c.name,
                code: c.calling_code,
            });
        }
        c.calling_code = code.to_string();
        if c.flag == Flag::Missing {
            if let Some(iso) = c.iso_code.as_deref() {
                c.flag = Flag::from_iso(iso);
            }
        }
        if !seen.insert(c.key()) {
            return Err(DatasetError::DuplicateKey(c.key()));
        }
        out.push(c);
    }
    Ok(out)
}

pub fn find_by_iso<'a>(countries: &'a [Country], iso: &str) -> Option<&'a Country> {
    countries.iter().find(|c| {
        c.iso_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(iso))
    })
}

/// The built-in dataset, sorted by name.
pub fn builtin() -> Arc<[Country]> {
    BUILTIN.clone()
}

static BUILTIN: LazyLock<Arc<[Country]>> = LazyLock::new(|| {
    BUILTIN_TABLE
        .iter()
        .map(|(name, iso, code)| Country::with_iso(*name, *iso, *code))
        .collect()
});

// (name, ISO 3166-1 alpha-2, calling code)
const BUILTIN_TABLE: &[(&str, &str, &str)] = &[
    ("Afghanistan", "AF", "93"),
    ("Albania", "AL", "355"),
    ("Algeria", "DZ", "213"),
    ("Andorra", "AD", "376"),
    ("Angola", "AO", "244"),
    ("Antigua and Barbuda", "AG", "1"),
    ("Argentina", "AR", "54"),
    ("Armenia", "AM", "374"),
    ("Australia", "AU", "61"),
    ("Austria", "AT", "43"),
    ("Azerbaijan", "AZ", "994"),
    ("Bahamas", "BS", "1"),
    ("Bahrain", "BH", "973"),
    ("Bangladesh", "BD", "880"),
    ("Barbados", "BB", "1"),
    ("Belarus", "BY", "375"),
    ("Belgium", "BE", "32"),
    ("Belize", "BZ", "501"),
    ("Benin", "BJ", "229"),
    ("Bhutan", "BT", "975"),
    ("Bolivia", "BO", "591"),
    ("Bosnia and Herzegovina", "BA", "387"),
    ("Botswana", "BW", "267"),
    ("Brazil", "BR", "55"),
    ("Brunei", "BN", "673"),
    ("Bulgaria", "BG", "359"),
    ("Burkina Faso", "BF", "226"),
    ("Burundi", "BI", "257"),
    ("Cambodia", "KH", "855"),
    ("Cameroon", "CM", "237"),
    ("Canada", "CA", "1"),
    ("Cape Verde", "CV", "238"),
    ("Central African Republic", "CF", "236"),
    ("Chad", "TD", "235"),
    ("Chile", "CL", "56"),
    ("China", "CN", "86"),
    ("Colombia", "CO", "57"),
    ("Comoros", "KM", "269"),
    ("Congo", "CG", "242"),
    ("Costa Rica", "CR", "506"),
    ("Croatia", "HR", "385"),
    ("Cuba", "CU", "53"),
    ("Cyprus", "CY", "357"),
    ("Czech Republic", "CZ", "420"),
    ("Democratic Republic of the Congo", "CD", "243"),
    ("Denmark", "DK", "45"),
    ("Djibouti", "DJ", "253"),
    ("Dominica", "DM", "1"),
    ("Dominican Republic", "DO", "1"),
    ("Ecuador", "EC", "593"),
    ("Egypt", "EG", "20"),
    ("El Salvador", "SV", "503"),
    ("Equatorial Guinea", "GQ", "240"),
    ("Eritrea", "ER", "291"),
    ("Estonia", "EE", "372"),
    ("Eswatini", "SZ", "268"),
    ("Ethiopia", "ET", "251"),
    ("Fiji", "FJ", "679"),
    ("Finland", "FI", "358"),
    ("France", "FR", "33"),
    ("Gabon", "GA", "241"),
    ("Gambia", "GM", "220"),
    ("Georgia", "GE", "995"),
    ("Germany", "DE", "49"),
    ("Ghana", "GH", "233"),
    ("Greece", "GR", "30"),
    ("Grenada", "GD", "1"),
    ("Guatemala", "GT", "502"),
    ("Guinea", "GN", "224"),
    ("Guinea-Bissau", "GW", "245"),
    ("Guyana", "GY", "592"),
    ("Haiti", "HT", "509"),
    ("Honduras", "HN", "504"),
    ("Hong Kong", "HK", "852"),
    ("Hungary", "HU", "36"),
    ("Iceland", "IS", "354"),
    ("India", "IN", "91"),
    ("Indonesia", "ID", "62"),
    ("Iran", "IR", "98"),
    ("Iraq", "IQ", "964"),
    ("Ireland", "IE", "353"),
    ("Israel", "IL", "972"),
    ("Italy", "IT", "39"),
    ("Ivory Coast", "CI", "225"),
    ("Jamaica", "JM", "1"),
    ("Japan", "JP", "81"),
    ("Jordan", "JO", "962"),
    ("Kazakhstan", "KZ", "7"),
    ("Kenya", "KE", "254"),
    ("Kiribati", "KI", "686"),
    ("Kosovo", "XK", "383"),
    ("Kuwait", "KW", "965"),
    ("Kyrgyzstan", "KG", "996"),
    ("Laos", "LA", "856"),
    ("Latvia", "LV", "371"),
    ("Lebanon", "LB", "961"),
    ("Lesotho", "LS", "266"),
    ("Liberia", "LR", "231"),
    ("Libya", "LY", "218"),
    ("Liechtenstein", "LI", "423"),
    ("Lithuania", "LT", "370"),
    ("Luxembourg", "LU", "352"),
    ("Macau", "MO", "853"),
    ("Madagascar", "MG", "261"),
    ("Malawi", "MW", "265"),
    ("Malaysia", "MY", "60"),
    ("Maldives", "MV", "960"),
    ("Mali", "ML", "223"),
    ("Malta", "MT", "356"),
    ("Marshall Islands", "MH", "692"),
    ("Mauritania", "MR", "222"),
    ("Mauritius", "MU", "230"),
    ("Mexico", "MX", "52"),
    ("Micronesia", "FM", "691"),
    ("Moldova", "MD", "373"),
    ("Monaco", "MC", "377"),
    ("Mongolia", "MN", "976"),
    ("Montenegro", "ME", "382"),
    ("Morocco", "MA", "212"),
    ("Mozambique", "MZ", "258"),
    ("Myanmar", "MM", "95"),
    ("Namibia", "NA", "264"),
    ("Nauru", "NR", "674"),
    ("Nepal", "NP", "977"),
    ("Netherlands", "NL", "31"),
    ("New Zealand", "NZ", "64"),
    ("Nicaragua", "NI", "505"),
    ("Niger", "NE", "227"),
    ("Nigeria", "NG", "234"),
    ("North Korea", "KP", "850"),
    ("North Macedonia", "MK", "389"),
    ("Norway", "NO", "47"),
    ("Oman", "OM", "968"),
    ("Pakistan", "PK", "92"),
    ("Palau", "PW", "680"),
    ("Palestine", "PS", "970"),
    ("Panama", "PA", "507"),
    ("Papua New Guinea", "PG", "675"),
    ("Paraguay", "PY", "595"),
    ("Peru", "PE", "51"),
    ("Philippines", "PH", "63"),
    ("Poland", "PL", "48"),
    ("Portugal", "PT", "351"),
    ("Puerto Rico", "PR", "1"),
    ("Qatar", "QA", "974"),
    ("Romania", "RO", "40"),
    ("Russia", "RU", "7"),
    ("Rwanda", "RW", "250"),
    ("Saint Kitts and Nevis", "KN", "1"),
    ("Saint Lucia", "LC", "1"),
    ("Saint Vincent and the Grenadines", "VC", "1"),
    ("Samoa", "WS", "685"),
    ("San Marino", "SM", "378"),
    ("Sao Tome and Principe", "ST", "239"),
    ("Saudi Arabia", "SA", "966"),
    ("Senegal", "SN", "221"),
    ("Serbia", "RS", "381"),
    ("Seychelles", "SC", "248"),
    ("Sierra Leone", "SL", "232"),
    ("Singapore", "SG", "65"),
    ("Slovakia", "SK", "421"),
    ("Slovenia", "SI", "386"),
    ("Solomon Islands", "SB", "677"),
    ("Somalia", "SO", "252"),
    ("South Africa", "ZA", "27"),
    ("South Korea", "KR", "82"),
    ("South Sudan", "SS", "211"),
    ("Spain", "ES", "34"),
    ("Sri Lanka", "LK", "94"),
    ("Sudan", "SD", "249"),
    ("Suriname", "SR", "597"),
    ("Sweden", "SE", "46"),
    ("Switzerland", "CH", "41"),
    ("Syria", "SY", "963"),
    ("Taiwan", "TW", "886"),
    ("Tajikistan", "TJ", "992"),
    ("Tanzania", "TZ", "255"),
    ("Thailand", "TH", "66"),
    ("Timor-Leste", "TL", "670"),
    ("Togo", "TG", "228"),
    ("Tonga", "TO", "676"),
    ("Trinidad and Tobago", "TT", "1"),
    ("Tunisia", "TN", "216"),
    ("Turkey", "TR", "90"),
    ("Turkmenistan", "TM", "993"),
    ("Tuvalu", "TV", "688"),
    ("Uganda", "UG", "256"),
    ("Ukraine", "UA", "380"),
    ("United Arab Emirates", "AE", "971"),
    ("United Kingdom", "GB", "44"),
    ("United States", "US", "1"),
    ("Uruguay", "UY", "598"),
    ("Uzbekistan", "UZ", "998"),
    ("Vanuatu", "VU", "678"),
    ("Vatican City", "VA", "39"),
    ("Venezuela", "VE", "58"),
    ("Vietnam", "VN", "84"),
    ("Yemen", "YE", "967"),
    ("Zambia", "ZM", "260"),
    ("Zimbabwe", "ZW", "263"),
];
