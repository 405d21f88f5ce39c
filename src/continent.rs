use serde::Serialize;

/// Continent of an event's country, for the month × continent breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
    /// Missing or unrecognized country code
    Unknown,
}

impl Continent {
    /// Resolve an ISO 3166-1 alpha-2 country code (case-insensitive).
    pub fn from_country_code(code: &str) -> Self {
        let upper = code.trim().to_ascii_uppercase();
        // Antarctica has no entry in the general table
        if upper == "AQ" {
            return Self::Antarctica;
        }
        lookup(&upper).unwrap_or_else(|| {
            log::debug!("No continent for country code {code:?}");
            Self::Unknown
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Antarctica => "Antarctica",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::Oceania => "Oceania",
            Self::SouthAmerica => "South America",
            Self::Unknown => "Unknown",
        }
    }
}

/// General country → continent table.
fn lookup(code: &str) -> Option<Continent> {
    use Continent::*;
    let continent = match code {
        "DZ" | "AO" | "BJ" | "BW" | "BF" | "BI" | "CV" | "CM" | "CF" | "TD" | "KM" | "CG"
        | "CD" | "CI" | "DJ" | "EG" | "GQ" | "ER" | "SZ" | "ET" | "GA" | "GM" | "GH" | "GN"
        | "GW" | "KE" | "LS" | "LR" | "LY" | "MG" | "MW" | "ML" | "MR" | "MU" | "YT" | "MA"
        | "MZ" | "NA" | "NE" | "NG" | "RE" | "RW" | "SH" | "ST" | "SN" | "SC" | "SL" | "SO"
        | "ZA" | "SS" | "SD" | "TZ" | "TG" | "TN" | "UG" | "EH" | "ZM" | "ZW" => Africa,

        "BV" | "GS" | "HM" | "TF" => Antarctica,

        "AF" | "AM" | "AZ" | "BH" | "BD" | "BT" | "BN" | "KH" | "CN" | "CY" | "GE" | "HK"
        | "IN" | "ID" | "IR" | "IQ" | "IL" | "JP" | "JO" | "KZ" | "KP" | "KR" | "KW" | "KG"
        | "LA" | "LB" | "MO" | "MY" | "MV" | "MN" | "MM" | "NP" | "OM" | "PK" | "PS" | "PH"
        | "QA" | "SA" | "SG" | "LK" | "SY" | "TW" | "TJ" | "TH" | "TL" | "TR" | "TM" | "AE"
        | "UZ" | "VN" | "YE" | "IO" | "CX" | "CC" => Asia,

        "AL" | "AD" | "AT" | "BY" | "BE" | "BA" | "BG" | "HR" | "CZ" | "DK" | "EE" | "FO"
        | "FI" | "FR" | "DE" | "GI" | "GR" | "GG" | "VA" | "HU" | "IS" | "IE" | "IM" | "IT"
        | "JE" | "XK" | "LV" | "LI" | "LT" | "LU" | "MT" | "MD" | "MC" | "ME" | "NL" | "MK"
        | "NO" | "PL" | "PT" | "RO" | "RU" | "SM" | "RS" | "SK" | "SI" | "ES" | "SJ" | "SE"
        | "CH" | "UA" | "GB" | "AX" => Europe,

        "AI" | "AG" | "AW" | "BS" | "BB" | "BZ" | "BM" | "BQ" | "VG" | "CA" | "KY" | "CR"
        | "CU" | "CW" | "DM" | "DO" | "SV" | "GL" | "GD" | "GP" | "GT" | "HT" | "HN" | "JM"
        | "MQ" | "MX" | "MS" | "NI" | "PA" | "PR" | "BL" | "KN" | "LC" | "MF" | "PM" | "VC"
        | "SX" | "TT" | "TC" | "US" | "VI" | "UM" => NorthAmerica,

        "AS" | "AU" | "CK" | "FJ" | "PF" | "GU" | "KI" | "MH" | "FM" | "NR" | "NC" | "NZ"
        | "NU" | "NF" | "MP" | "PW" | "PG" | "PN" | "WS" | "SB" | "TK" | "TO" | "TV" | "VU"
        | "WF" => Oceania,

        "AR" | "BO" | "BR" | "CL" | "CO" | "EC" | "FK" | "GF" | "GY" | "PY" | "PE" | "SR"
        | "UY" | "VE" => SouthAmerica,

        _ => return None,
    };
    Some(continent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_codes() {
        assert_eq!(Continent::from_country_code("US"), Continent::NorthAmerica);
        assert_eq!(Continent::from_country_code("GB"), Continent::Europe);
        assert_eq!(Continent::from_country_code("JP"), Continent::Asia);
        assert_eq!(Continent::from_country_code("BR"), Continent::SouthAmerica);
        assert_eq!(Continent::from_country_code("AU"), Continent::Oceania);
        assert_eq!(Continent::from_country_code("ZA"), Continent::Africa);
    }

    #[test]
    fn test_antarctica_override() {
        assert!(lookup("AQ").is_none());
        assert_eq!(Continent::from_country_code("AQ"), Continent::Antarctica);
        assert_eq!(Continent::from_country_code("aq"), Continent::Antarctica);
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(Continent::from_country_code(" de "), Continent::Europe);
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(Continent::from_country_code("ZZ"), Continent::Unknown);
        assert_eq!(Continent::from_country_code(""), Continent::Unknown);
        assert_eq!(Continent::Unknown.name(), "Unknown");
    }
}
