use std::collections::HashSet;
use thiserror::Error;
use crate::models::{Jurisdiction, Scheme};

/// Errors raised while building a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate scheme id: {0}")]
    DuplicateId(String),

    #[error("Scheme has an empty id")]
    EmptyId,

    #[error("Scheme {0} has an empty region name")]
    EmptyRegion(String),
}

/// Ordered, read-only collection of welfare schemes
#[derive(Debug, Clone)]
pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
}

impl SchemeCatalog {
    /// Build a catalog, checking id uniqueness and region names
    pub fn new(schemes: Vec<Scheme>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(schemes.len());
        for scheme in &schemes {
            if scheme.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if let Jurisdiction::Region(name) = &scheme.jurisdiction {
                if name.trim().is_empty() {
                    return Err(CatalogError::EmptyRegion(scheme.id.clone()));
                }
            }
            if !seen.insert(scheme.id.as_str()) {
                return Err(CatalogError::DuplicateId(scheme.id.clone()));
            }
        }
        Ok(Self { schemes })
    }

    /// The built-in seed table
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(seed_schemes())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheme> {
        self.schemes.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Scheme> {
        self.schemes.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn scheme(
    id: &str,
    (name, name_hi): (&str, &str),
    (description, description_hi): (&str, &str),
    eligibility: &[&str],
    eligibility_hi: &[&str],
    (benefits, benefits_hi): (&str, &str),
    (category, category_hi): (&str, &str),
    source_url: &str,
    jurisdiction: Jurisdiction,
) -> Scheme {
    Scheme {
        id: id.to_string(),
        name: name.to_string(),
        name_hi: name_hi.to_string(),
        description: description.to_string(),
        description_hi: description_hi.to_string(),
        eligibility: eligibility.iter().map(|s| s.to_string()).collect(),
        eligibility_hi: eligibility_hi.iter().map(|s| s.to_string()).collect(),
        benefits: benefits.to_string(),
        benefits_hi: benefits_hi.to_string(),
        category: category.to_string(),
        category_hi: category_hi.to_string(),
        source_url: source_url.to_string(),
        jurisdiction,
    }
}

fn seed_schemes() -> Vec<Scheme> {
    vec![
        scheme(
            "pm_kisan",
            ("PM-KISAN", "पीएम-किसान"),
            (
                "Income support for landholding farmer families.",
                "भूमिधारक किसान परिवारों के लिए आय सहायता।",
            ),
            &["Landholding farmer family", "Valid Aadhaar linked bank account"],
            &["भूमिधारक किसान परिवार", "आधार से जुड़ा वैध बैंक खाता"],
            (
                "Rs 6,000 per year in three instalments",
                "तीन किस्तों में प्रति वर्ष 6,000 रुपये",
            ),
            ("Agriculture", "कृषि"),
            "https://pmkisan.gov.in",
            Jurisdiction::Nationwide,
        ),
        scheme(
            "rythu_bandhu",
            ("Rythu Bandhu", "रायतु बंधु"),
            (
                "Investment support for farmers in Telangana for each crop season.",
                "तेलंगाना के किसानों के लिए प्रत्येक फसल मौसम में निवेश सहायता।",
            ),
            &["Farmer owning agricultural land in Telangana"],
            &["तेलंगाना में कृषि भूमि का स्वामी किसान"],
            (
                "Rs 5,000 per acre per season",
                "प्रति मौसम प्रति एकड़ 5,000 रुपये",
            ),
            ("Agriculture", "कृषि"),
            "https://rythubandhu.telangana.gov.in",
            Jurisdiction::region("Telangana"),
        ),
        scheme(
            "pm_svanidhi",
            ("PM SVANidhi", "पीएम स्वनिधि"),
            (
                "Collateral-free working capital loans for street vendors.",
                "रेहड़ी-पटरी विक्रेताओं के लिए बिना गारंटी कार्यशील पूंजी ऋण।",
            ),
            &["Street vendor vending in urban areas", "Certificate of vending or letter of recommendation"],
            &["शहरी क्षेत्रों में रेहड़ी-पटरी विक्रेता", "वेंडिंग प्रमाण पत्र या सिफारिश पत्र"],
            (
                "Loans of Rs 10,000 to Rs 50,000 with interest subsidy",
                "ब्याज सब्सिडी के साथ 10,000 से 50,000 रुपये तक का ऋण",
            ),
            ("Livelihood", "आजीविका"),
            "https://pmsvanidhi.mohua.gov.in",
            Jurisdiction::Nationwide,
        ),
        scheme(
            "ayushman_bharat",
            ("Ayushman Bharat PM-JAY", "आयुष्मान भारत पीएम-जेएवाई"),
            (
                "Health cover for hospitalisation for low-income families.",
                "कम आय वाले परिवारों के लिए अस्पताल में भर्ती हेतु स्वास्थ्य बीमा।",
            ),
            &["Annual household income below Rs 5,00,000", "Listed in SECC database or state beneficiary list"],
            &["वार्षिक पारिवारिक आय 5,00,000 रुपये से कम", "एसईसीसी डेटाबेस या राज्य लाभार्थी सूची में नाम"],
            (
                "Cashless cover up to Rs 5,00,000 per family per year",
                "प्रति परिवार प्रति वर्ष 5,00,000 रुपये तक कैशलेस उपचार",
            ),
            ("Health", "स्वास्थ्य"),
            "https://pmjay.gov.in",
            Jurisdiction::Nationwide,
        ),
        scheme(
            "atal_pension_yojana",
            ("Atal Pension Yojana", "अटल पेंशन योजना"),
            (
                "Guaranteed pension for workers in the unorganised sector.",
                "असंगठित क्षेत्र के श्रमिकों के लिए गारंटीकृत पेंशन।",
            ),
            &["Age between 18 and 40 years", "Savings bank account"],
            &["आयु 18 से 40 वर्ष के बीच", "बचत बैंक खाता"],
            (
                "Monthly pension of Rs 1,000 to Rs 5,000 after age 60",
                "60 वर्ष की आयु के बाद 1,000 से 5,000 रुपये मासिक पेंशन",
            ),
            ("Pension", "पेंशन"),
            "https://npscra.nsdl.co.in/scheme-details.php",
            Jurisdiction::Nationwide,
        ),
        scheme(
            "sukanya_samriddhi",
            ("Sukanya Samriddhi Yojana", "सुकन्या समृद्धि योजना"),
            (
                "Small savings account for the education and marriage of a girl child.",
                "बालिका की शिक्षा और विवाह के लिए लघु बचत खाता।",
            ),
            &["Girl child aged 10 years or below", "Account opened by parent or guardian"],
            &["10 वर्ष या उससे कम आयु की बालिका", "माता-पिता या अभिभावक द्वारा खाता"],
            (
                "High interest rate with tax benefits on deposits",
                "जमा पर कर लाभ के साथ उच्च ब्याज दर",
            ),
            ("Savings", "बचत"),
            "https://www.indiapost.gov.in",
            Jurisdiction::Nationwide,
        ),
        scheme(
            "ladli_behna",
            ("Ladli Behna Yojana", "लाडली बहना योजना"),
            (
                "Monthly financial assistance for women in Madhya Pradesh.",
                "मध्य प्रदेश की महिलाओं के लिए मासिक आर्थिक सहायता।",
            ),
            &["Woman aged 21 to 60 years", "Resident of Madhya Pradesh", "Family income below Rs 2,50,000"],
            &["21 से 60 वर्ष की महिला", "मध्य प्रदेश की निवासी", "पारिवारिक आय 2,50,000 रुपये से कम"],
            (
                "Rs 1,250 per month credited to the bank account",
                "बैंक खाते में प्रति माह 1,250 रुपये",
            ),
            ("Women", "महिला"),
            "https://cmladlibahna.mp.gov.in",
            Jurisdiction::region("Madhya Pradesh"),
        ),
        scheme(
            "kanyashree",
            ("Kanyashree Prakalpa", "कन्याश्री प्रकल्प"),
            (
                "Scholarship that keeps girls in school in West Bengal.",
                "पश्चिम बंगाल में बालिकाओं को विद्यालय में बनाए रखने हेतु छात्रवृत्ति।",
            ),
            &["Girl student aged 13 to 18 years", "Enrolled in a recognised institution", "Resident of West Bengal"],
            &["13 से 18 वर्ष की छात्रा", "मान्यता प्राप्त संस्थान में नामांकित", "पश्चिम बंगाल की निवासी"],
            (
                "Annual scholarship of Rs 1,000 and a one-time grant of Rs 25,000",
                "1,000 रुपये वार्षिक छात्रवृत्ति और 25,000 रुपये का एकमुश्त अनुदान",
            ),
            ("Education", "शिक्षा"),
            "https://wbkanyashree.gov.in",
            Jurisdiction::region("West Bengal"),
        ),
        scheme(
            "gruha_jyothi",
            ("Gruha Jyothi", "गृह ज्योति"),
            (
                "Free household electricity in Karnataka.",
                "कर्नाटक में घरेलू बिजली निःशुल्क।",
            ),
            &["Domestic electricity connection in Karnataka", "Monthly usage within 200 units"],
            &["कर्नाटक में घरेलू बिजली कनेक्शन", "मासिक खपत 200 यूनिट के भीतर"],
            (
                "Free electricity up to 200 units per month",
                "प्रति माह 200 यूनिट तक निःशुल्क बिजली",
            ),
            ("Utilities", "उपयोगिता"),
            "https://sevasindhugs.karnataka.gov.in",
            Jurisdiction::region("Karnataka"),
        ),
        scheme(
            "pmay_gramin",
            ("PMAY-Gramin", "पीएमएवाई-ग्रामीण"),
            (
                "Assistance to build a pucca house for rural households.",
                "ग्रामीण परिवारों को पक्का घर बनाने के लिए सहायता।",
            ),
            &["Rural household without a pucca house", "Listed in SECC 2011 data"],
            &["पक्के घर के बिना ग्रामीण परिवार", "एसईसीसी 2011 डेटा में नाम"],
            (
                "Rs 1,20,000 in plains and Rs 1,30,000 in hilly areas",
                "मैदानी क्षेत्रों में 1,20,000 और पहाड़ी क्षेत्रों में 1,30,000 रुपये",
            ),
            ("Housing", "आवास"),
            "https://pmayg.nic.in",
            Jurisdiction::Nationwide,
        ),
    ]
}
