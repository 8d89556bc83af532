//! Reference data for prompt personalization: competency definitions and store category labels.
//!
//! Both tables are immutable statics keyed by code. Lookups by raw code return `None` for
//! codes outside the enumerations so callers can degrade instead of failing.

use crate::models::report::{Competency, StoreCategory};

/// Display name, definition and observable behaviors for one core competency.
#[derive(Debug)]
pub struct CompetencyProfile {
    pub code: Competency,
    pub name: &'static str,
    pub definition: &'static str,
    pub key_behaviors: &'static [&'static str],
}

pub static COMPETENCY_PROFILES: [CompetencyProfile; 5] = [
    CompetencyProfile {
        code: Competency::Integrity,
        name: "誠信積極",
        definition: "展現真誠，保持言行一致，遵從道德與倫理、專業與組織的準則，對自己的優劣勢有充分了解，\
            對自己的行為對他人的影響有所覺察，努力贏得他人的對個人或組織的信任。\
            主動採取行動以確保達標或超越要求，展現積極熱忱的態度。",
        key_behaviors: &[
            "遵守道德與倫理、專業標準、規章及組織政策，展現真誠態度，並做出行動來實現所做的承諾，確保言談舉止在不同情況下保持一致",
            "願意分享個人想法、意見、觀點與立場，尊重並平等對待他人，既使遭遇不同意見或挑戰也能支持他人好的想法",
            "當發生錯誤時，能勇於負責並承認錯誤，採取適當因應措施",
            "了解自己的發展目標與目前的發展狀況，積極尋求他人平衡回饋，願意考慮他人的回饋意見並適當調整自己的行為",
            "遇到問題或需要有所回應時，能立即採取行動，願意超越工作範圍要求的行動，以更好地達成目標",
        ],
    },
    CompetencyProfile {
        code: Competency::Excellence,
        name: "追求卓越",
        definition: "為他人及自己設立高績效檢驗的標準，對成功完成任務有強烈使命感。\
            面臨困難挑戰或挫敗拒絕的情境，能妥善處理並繼續保持工作效率。",
        key_behaviors: &[
            "建立一套卓越的工作模式或流程以達到高標準的品質及服務",
            "致力確保高品質，為工作投注所需時間和精力，確保顧及該有層面且沒有遺漏處，努力克服任務過程中所碰到的障礙",
            "面對工作進度要求和工作挑戰仍將注意力保持在重要任務上，有效管理相衝突的不同要求",
            "能在遭遇挫折後繼續維持工作效率，把挫折視為挑戰，盡職負責並持續努力，展現全力以赴的態度",
        ],
    },
    CompetencyProfile {
        code: Competency::Innovation,
        name: "引發創新",
        definition: "嘗試不同或新的觀點或方式來處理問題或機會，持續發展創新且可行的解決方法。\
            面對挑戰或困難時展現正面思考，願意展現正向能量協助他人看見機會所在，\
            主動尋求學習機會並將學習所得落實運用在工作中。",
        key_behaviors: &[
            "願意去思考問題背後的可能假設，用不同角度來看待問題，挑戰既定觀點或模式，不被既有想法或做法限制",
            "願意在變動或困難情境中看到正面意義，鼓勵他人採取正面態度看待變化或困難",
            "向不同的人或來源尋求創意想法，擴大思考範圍，在不相關想法上找出可能的關聯性，願意與他人腦力激盪想出不同解決方式",
            "致力找出將所學新知識或技巧實際應用在工作上的機會，承擔學習過程中可能產生的風險，願意挑戰性或尚未熟悉的任務",
        ],
    },
    CompetencyProfile {
        code: Competency::Service,
        name: "服務導向",
        definition: "致力瞭解內外部客戶，將符合內外部客戶的需要視為較為優先的要務。\
            與內外部顧客尋求建立及持續維持良性合作關係。",
        key_behaviors: &[
            "主動尋求更多管道或資訊來了解內外部客戶面臨的情境、問題、期望及需要",
            "與內外部客戶分享資訊，幫助內外部客戶了解所處狀況及可提供服務，適時教育客戶",
            "運用適當人際技巧，邀請內外部客戶參與意見，致力與內外部客戶尋求建立及維持良性合作關係",
            "考量所採取的行動或計劃會對內外部客戶產生什麼影響，迅速回應內外部客戶需求或問題，並留意避免過度承諾",
            "運用有效方法來了解並評估內外部客戶的考量、問題及滿意度，並預期內外部客戶的潛在需求",
        ],
    },
    CompetencyProfile {
        code: Competency::Teamwork,
        name: "團隊共贏",
        definition: "善盡個人在團隊中的職責，展現投入與支持團隊，積極參與團隊的任務，以促進團隊達成目標。",
        key_behaviors: &[
            "瞭解自身在團隊中扮演的職責與角色，以完成團隊目標或執行團隊任務為己任",
            "以身作則，切實遵守團隊的期許及規範，履行團隊賦予的責任及個人對團隊的承諾",
            "在團隊討論時能傾聽他人意見，邀請他人參與團隊決策或行動，與團隊成員分享重要且與工作相關的訊息",
            "全力投入，提供必要資源或協助移除障礙，與成員合作以幫助團隊完成目標，尋求共贏的可能性",
            "重視、欣賞並善用團隊成員間不同的才能與專長，找出團隊合作的最大綜效",
        ],
    },
];

pub static CATEGORY_LABELS: [(StoreCategory, &str); 10] = [
    (StoreCategory::Skincare, "保養"),
    (StoreCategory::Makeup, "彩妝"),
    (StoreCategory::Fragrance, "香水香氛"),
    (StoreCategory::WomenLuxury, "女仕精品"),
    (StoreCategory::MenLuxury, "男仕精品"),
    (StoreCategory::Digital, "數位家電"),
    (StoreCategory::Toys, "玩具"),
    (StoreCategory::Home, "居家生活"),
    (StoreCategory::Souvenir, "伴手禮"),
    (StoreCategory::TobaccoAlcohol, "菸酒"),
];

pub fn competency_profile(competency: Competency) -> &'static CompetencyProfile {
    // The table has one row per variant, in declaration order.
    &COMPETENCY_PROFILES[competency as usize]
}

pub fn category_label(category: StoreCategory) -> &'static str {
    CATEGORY_LABELS[category as usize].1
}

/// Looks up a competency profile by raw code.
pub fn competency_profile_by_code(code: &str) -> Option<&'static CompetencyProfile> {
    code.parse::<Competency>().ok().map(competency_profile)
}

/// Looks up a category display label by raw code.
pub fn category_label_by_code(code: &str) -> Option<&'static str> {
    code.parse::<StoreCategory>().ok().map(category_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competency_table_is_indexed_by_variant() {
        for competency in Competency::ALL {
            assert_eq!(competency_profile(competency).code, competency);
        }
    }

    #[test]
    fn test_category_table_is_indexed_by_variant() {
        for category in StoreCategory::ALL {
            assert_eq!(CATEGORY_LABELS[category as usize].0, category);
        }
    }

    #[test]
    fn test_every_competency_has_definition_and_behaviors() {
        for profile in &COMPETENCY_PROFILES {
            assert!(!profile.definition.is_empty());
            assert!(profile.key_behaviors.len() >= 4, "{:?}", profile.code);
        }
    }

    #[test]
    fn test_lookup_by_code() {
        assert_eq!(competency_profile_by_code("service").unwrap().name, "服務導向");
        assert_eq!(category_label_by_code("tobacco_alcohol"), Some("菸酒"));
        assert!(competency_profile_by_code("leadership").is_none());
        assert!(category_label_by_code("garden").is_none());
    }
}
