#![deny(unsafe_code)]

//! Built-in code tables from the time-use survey codebook.
//!
//! Keys are written without zero padding; lookups fall back to the
//! zero-stripped form of a code, so `"07"` and `"7"` both resolve.

use tus_model::CodeMap;

pub const GENDER: &str = "gender";
pub const MARITAL_STATUS: &str = "marital_status";
pub const EDUCATION: &str = "education";
pub const RELIGION: &str = "religion";
pub const SOCIAL_GROUP: &str = "social_group";
pub const PRINCIPAL_ACTIVITY: &str = "principal_activity";
pub const INDUSTRY: &str = "industry";
pub const ACTIVITY_CODE: &str = "activity_code";
pub const ACTIVITY_LOCATION: &str = "activity_location";
pub const PAYMENT_STATUS: &str = "payment_status";
pub const ENTERPRISE_TYPE: &str = "enterprise_type";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const DAY_TYPE: &str = "day_type";
pub const RESPONSE_CODE: &str = "response_code";
pub const RELATION_TO_HEAD: &str = "relation_to_head";
pub const STATE: &str = "state";
pub const YES_NO: &str = "yes_no";
/// Yes/no flag where a blank answer means the activity did take place.
pub const YES_NO_DEFAULT_YES: &str = "yes_no_default_yes";

const GENDER_CODES: &[(&str, &str)] = &[("1", "male"), ("2", "female"), ("3", "transgender")];

const MARITAL_STATUS_CODES: &[(&str, &str)] = &[
    ("1", "never married"),
    ("2", "currently married"),
    ("3", "widowed"),
    ("4", "divorced/separated"),
];

const EDUCATION_CODES: &[(&str, &str)] = &[
    ("1", "not literate"),
    ("2", "literate: without formal schooling: EGS/NFEC/AEC"),
    ("3", "literate: without formal schooling: TLC"),
    ("4", "literate: without formal schooling: others"),
    ("5", "literate: below primary"),
    ("6", "primary"),
    ("7", "upper primary/middle"),
    ("8", "secondary"),
    ("10", "higher secondary"),
    ("11", "diploma/certificate course (up to secondary)"),
    ("12", "diploma/certificate course (higher secondary)"),
    ("13", "diploma/certificate course (graduation and above)"),
    ("14", "graduate"),
    ("15", "postgraduate and above"),
];

const RELIGION_CODES: &[(&str, &str)] = &[
    ("1", "Hinduism"),
    ("2", "Islam"),
    ("3", "Christianity"),
    ("4", "Sikhism"),
    ("5", "Jainism"),
    ("6", "Buddhism"),
    ("7", "Zoroastrianism"),
    ("9", "others"),
];

const SOCIAL_GROUP_CODES: &[(&str, &str)] = &[
    ("1", "scheduled tribe"),
    ("2", "scheduled caste"),
    ("3", "other backward class"),
    ("9", "others"),
];

const PRINCIPAL_ACTIVITY_CODES: &[(&str, &str)] = &[
    ("11", "self-employed: own account worker"),
    ("12", "self-employed: employer"),
    ("21", "helper in household enterprise"),
    ("31", "regular salaried/wage employee"),
    ("41", "casual wage labour: public works"),
    ("51", "casual wage labour: other types of work"),
    ("81", "seeking and/or available for work"),
    ("91", "attended educational institution"),
    ("92", "attended domestic duties only"),
    ("93", "attended domestic duties and free collection of goods"),
    ("94", "rentiers, pensioners, remittance recipients"),
    ("95", "not able to work due to disability"),
    ("97", "others (including begging, prostitution)"),
    ("99", "children aged 0-4"),
];

const INDUSTRY_CODES: &[(&str, &str)] = &[
    ("1", "crop and animal production, hunting"),
    ("2", "forestry and logging"),
    ("3", "fishing and aquaculture"),
    ("5", "mining of coal and lignite"),
    ("6", "extraction of crude petroleum and natural gas"),
    ("7", "mining of metal ores"),
    ("8", "other mining and quarrying"),
    ("9", "mining support service activities"),
    ("10", "manufacture of food products"),
    ("11", "manufacture of beverages"),
    ("12", "manufacture of tobacco products"),
    ("13", "manufacture of textiles"),
    ("14", "manufacture of wearing apparel"),
    ("15", "manufacture of leather and related products"),
    ("16", "manufacture of wood and products of wood"),
    ("17", "manufacture of paper and paper products"),
    ("18", "printing and reproduction of recorded media"),
    ("19", "manufacture of coke and refined petroleum products"),
    ("20", "manufacture of chemicals and chemical products"),
    ("21", "manufacture of pharmaceuticals"),
    ("22", "manufacture of rubber and plastics products"),
    ("23", "manufacture of other non-metallic mineral products"),
    ("24", "manufacture of basic metals"),
    ("25", "manufacture of fabricated metal products"),
    ("26", "manufacture of computer, electronic and optical products"),
    ("27", "manufacture of electrical equipment"),
    ("28", "manufacture of machinery and equipment n.e.c."),
    ("29", "manufacture of motor vehicles"),
    ("30", "manufacture of other transport equipment"),
    ("31", "manufacture of furniture"),
    ("32", "other manufacturing"),
    ("33", "repair and installation of machinery and equipment"),
    ("35", "electricity, gas, steam and air conditioning supply"),
    ("36", "water collection, treatment and supply"),
    ("37", "sewerage"),
    ("38", "waste collection, treatment and disposal"),
    ("39", "remediation and other waste management"),
    ("41", "construction of buildings"),
    ("42", "civil engineering"),
    ("43", "specialised construction activities"),
    ("45", "trade and repair of motor vehicles and motorcycles"),
    ("46", "wholesale trade"),
    ("47", "retail trade"),
    ("49", "land transport"),
    ("50", "water transport"),
    ("51", "air transport"),
    ("52", "warehousing and support activities for transportation"),
    ("53", "postal and courier activities"),
    ("55", "accommodation"),
    ("56", "food and beverage service activities"),
    ("58", "publishing activities"),
    ("59", "motion picture, video and television production"),
    ("60", "broadcasting"),
    ("61", "telecommunications"),
    ("62", "computer programming and consultancy"),
    ("63", "information service activities"),
    ("64", "financial service activities"),
    ("65", "insurance and pension funding"),
    ("66", "activities auxiliary to financial services"),
    ("68", "real estate activities"),
    ("69", "legal and accounting activities"),
    ("70", "head offices and management consultancy"),
    ("71", "architecture and engineering"),
    ("72", "scientific research and development"),
    ("73", "advertising and market research"),
    ("74", "other professional, scientific and technical activities"),
    ("75", "veterinary activities"),
    ("77", "rental and leasing activities"),
    ("78", "employment activities"),
    ("79", "travel agency and tour operator activities"),
    ("80", "security and investigation activities"),
    ("81", "services to buildings and landscape"),
    ("82", "office administrative and business support"),
    ("84", "public administration and defence"),
    ("85", "education"),
    ("86", "human health activities"),
    ("87", "residential care activities"),
    ("88", "social work without accommodation"),
    ("90", "creative, arts and entertainment activities"),
    ("91", "libraries, archives, museums"),
    ("92", "gambling and betting"),
    ("93", "sports, amusement and recreation"),
    ("94", "activities of membership organisations"),
    ("95", "repair of computers and personal goods"),
    ("96", "other personal service activities"),
    ("97", "households as employers of domestic personnel"),
    ("98", "undifferentiated production of households for own use"),
    ("99", "extraterritorial organisations"),
];

const ACTIVITY_CODES: &[(&str, &str)] = &[
    ("111", "employment in corporations, government and non-profit institutions"),
    ("121", "growing of crops for market in household enterprises"),
    ("122", "raising of animals for market in household enterprises"),
    ("123", "forestry and logging for market in household enterprises"),
    ("124", "fishing for market in household enterprises"),
    ("125", "aquaculture for market in household enterprises"),
    ("126", "mining and quarrying for market in household enterprises"),
    ("127", "making and processing goods for market in household enterprises"),
    ("128", "construction activities for market in household enterprises"),
    ("129", "vending and trading of goods in household enterprises"),
    ("131", "providing paid repair, installation and maintenance services"),
    ("132", "providing paid business and professional services"),
    ("133", "transporting goods and passengers for pay"),
    ("134", "providing paid personal care services"),
    ("135", "providing paid domestic services"),
    ("141", "ancillary activities and breaks related to employment"),
    ("151", "training and studies in relation to work"),
    ("161", "seeking employment"),
    ("171", "setting up a business"),
    ("181", "travelling and commuting for employment"),
    ("211", "growing crops for own final use"),
    ("212", "farming of animals for own final use"),
    ("213", "hunting, trapping and production of animal skins for own final use"),
    ("214", "forestry and logging for own final use"),
    ("215", "gathering wild products for own final use"),
    ("216", "fishing for own final use"),
    ("217", "aquaculture for own final use"),
    ("218", "mining and quarrying for own final use"),
    ("221", "making and processing goods for own final use"),
    ("231", "construction activities for own final use"),
    ("241", "supplying water and fuel for own household"),
    ("251", "travelling for production of goods for own final use"),
    ("311", "food and meals management and preparation"),
    ("312", "cleaning and maintaining of own dwelling and surroundings"),
    ("313", "do-it-yourself decoration, maintenance and repair"),
    ("314", "care and maintenance of textiles and footwear"),
    ("315", "household management for own final use"),
    ("316", "pet care"),
    ("317", "shopping for own household members"),
    ("318", "travelling for unpaid domestic services"),
    ("319", "other unpaid domestic services"),
    ("411", "childcare and instruction"),
    ("412", "care for dependent adults"),
    ("413", "help to non-dependent adult household members"),
    ("414", "travelling and accompanying goods or persons for caregiving"),
    ("419", "other unpaid caregiving services"),
    ("511", "unpaid direct volunteering for other households"),
    ("512", "unpaid community- and organisation-based volunteering"),
    ("521", "unpaid trainee work"),
    ("531", "unpaid other work activities"),
    ("541", "travelling related to unpaid volunteer and trainee work"),
    ("611", "formal education"),
    ("612", "homework and being tutored"),
    ("621", "additional study, non-formal education and courses"),
    ("631", "travelling time related to learning"),
    ("711", "socialising and communication"),
    ("712", "participating in community cultural and social events"),
    ("713", "involvement in civic and related responsibilities"),
    ("714", "religious practices"),
    ("715", "travelling related to socialising and community participation"),
    ("721", "other socialising and community participation"),
    ("811", "attending and visiting cultural, entertainment and sports events"),
    ("812", "cultural participation, hobbies and games"),
    ("813", "sports participation and exercising"),
    ("814", "mass media use"),
    ("815", "reflecting, resting and relaxing"),
    ("816", "travelling related to culture, leisure and sports"),
    ("911", "sleep and related activities"),
    ("912", "eating and drinking"),
    ("913", "personal hygiene and care"),
    ("914", "receiving health and medical care from others"),
    ("915", "receiving personal care from others"),
    ("916", "travelling related to self-care and maintenance"),
];

const ACTIVITY_LOCATION_CODES: &[(&str, &str)] = &[
    ("1", "inside the premises of the dwelling"),
    ("2", "outside the premises of the dwelling"),
];

const PAYMENT_STATUS_CODES: &[(&str, &str)] = &[
    ("1", "unpaid self-development"),
    ("2", "unpaid production of goods for own final use"),
    ("3", "unpaid domestic services for household members"),
    ("4", "unpaid caregiving for household members"),
    ("5", "unpaid volunteer work"),
    ("6", "unpaid trainee work"),
    ("7", "paid self-employment"),
    ("8", "paid regular wage/salaried"),
    ("9", "paid casual labour"),
];

const ENTERPRISE_TYPE_CODES: &[(&str, &str)] = &[
    ("1", "proprietary: male"),
    ("2", "proprietary: female"),
    ("3", "partnership with members of the same household"),
    ("4", "partnership with members from different households"),
    ("5", "government/public sector enterprise"),
    ("6", "public/private limited company"),
    ("7", "co-operative society, trust or non-profit institution"),
    ("8", "employer's household"),
    ("9", "others"),
];

const DAY_OF_WEEK_CODES: &[(&str, &str)] = &[
    ("1", "Sunday"),
    ("2", "Monday"),
    ("3", "Tuesday"),
    ("4", "Wednesday"),
    ("5", "Thursday"),
    ("6", "Friday"),
    ("7", "Saturday"),
];

const DAY_TYPE_CODES: &[(&str, &str)] = &[
    ("1", "normal day"),
    ("2", "weekly off/holiday"),
    ("3", "other day"),
];

const RESPONSE_CODES: &[(&str, &str)] = &[
    ("1", "informant co-operative and capable"),
    ("2", "informant co-operative but not capable"),
    ("3", "informant busy"),
    ("4", "informant reluctant"),
    ("9", "others"),
];

const RELATION_TO_HEAD_CODES: &[(&str, &str)] = &[
    ("1", "self"),
    ("2", "spouse of head"),
    ("3", "married child"),
    ("4", "spouse of married child"),
    ("5", "unmarried child"),
    ("6", "grandchild"),
    ("7", "father/mother/father-in-law/mother-in-law"),
    ("8", "brother/sister/brother-in-law/sister-in-law/other relatives"),
    ("9", "servant/employee/other non-relative"),
];

const STATE_CODES: &[(&str, &str)] = &[
    ("1", "Jammu & Kashmir"),
    ("2", "Himachal Pradesh"),
    ("3", "Punjab"),
    ("4", "Chandigarh"),
    ("5", "Uttarakhand"),
    ("6", "Haryana"),
    ("7", "Delhi"),
    ("8", "Rajasthan"),
    ("9", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman & Diu"),
    ("26", "Dadra & Nagar Haveli"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman & Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Ladakh"),
];

const YES_NO_CODES: &[(&str, &str)] = &[("1", "yes"), ("2", "no")];

/// Every built-in code map.
pub fn builtin_code_maps() -> Vec<CodeMap> {
    vec![
        CodeMap::from_pairs(GENDER, GENDER_CODES.iter().copied()),
        CodeMap::from_pairs(MARITAL_STATUS, MARITAL_STATUS_CODES.iter().copied()),
        CodeMap::from_pairs(EDUCATION, EDUCATION_CODES.iter().copied()),
        CodeMap::from_pairs(RELIGION, RELIGION_CODES.iter().copied()),
        CodeMap::from_pairs(SOCIAL_GROUP, SOCIAL_GROUP_CODES.iter().copied()),
        CodeMap::from_pairs(PRINCIPAL_ACTIVITY, PRINCIPAL_ACTIVITY_CODES.iter().copied()),
        CodeMap::from_pairs(INDUSTRY, INDUSTRY_CODES.iter().copied()),
        CodeMap::from_pairs(ACTIVITY_CODE, ACTIVITY_CODES.iter().copied()),
        CodeMap::from_pairs(ACTIVITY_LOCATION, ACTIVITY_LOCATION_CODES.iter().copied()),
        CodeMap::from_pairs(PAYMENT_STATUS, PAYMENT_STATUS_CODES.iter().copied()),
        CodeMap::from_pairs(ENTERPRISE_TYPE, ENTERPRISE_TYPE_CODES.iter().copied()),
        CodeMap::from_pairs(DAY_OF_WEEK, DAY_OF_WEEK_CODES.iter().copied()),
        CodeMap::from_pairs(DAY_TYPE, DAY_TYPE_CODES.iter().copied()),
        CodeMap::from_pairs(RESPONSE_CODE, RESPONSE_CODES.iter().copied()),
        CodeMap::from_pairs(RELATION_TO_HEAD, RELATION_TO_HEAD_CODES.iter().copied()),
        CodeMap::from_pairs(STATE, STATE_CODES.iter().copied()),
        CodeMap::from_pairs(YES_NO, YES_NO_CODES.iter().copied()),
        CodeMap::from_pairs(YES_NO_DEFAULT_YES, YES_NO_CODES.iter().copied())
            .with_null_fallback("yes"),
    ]
}
