use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORIES: [&str; 5] =
    ["健康关爱", "心理疏导", "生活福利", "荣誉激励", "家属优待"];
pub const DEFAULT_CATEGORY: &str = "健康关爱";

// Author shown when nobody is logged in, and the display name of the one
// admin account.
pub const DEFAULT_AUTHOR: &str = "管理处";
pub const ADMIN_DISPLAY_NAME: &str = "管理员";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: i64,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl Default for NoticeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn seed_notices(now: i64) -> Vec<Notice> {
    vec![
        Notice {
            id: fresh_id(),
            title: "关于开展全警年度健康体检的通知".to_string(),
            content: "为切实保障民辅警身体健康，分局决定于本月起分批次开展年度体检。\
                      请各单位按计划表组织人员前往指定医院。"
                .to_string(),
            category: "健康关爱".to_string(),
            created_at: now - 86_400_000,
            author: "政治处".to_string(),
        },
        Notice {
            id: fresh_id(),
            title: "民警之家心理咨询预约通道开启".to_string(),
            content: "近期基层勤务较重，为缓解同志们心理压力，心理健康中心现开放一对一\
                      在线预约服务，保护隐私，竭诚服务。"
                .to_string(),
            category: "心理疏导".to_string(),
            created_at: now - 8 * 3_600_000,
            author: "心理中心".to_string(),
        },
        Notice {
            id: fresh_id(),
            title: "惠警购：专属生活优待政策更新".to_string(),
            content: "本季度新增3家签约合作商超，全体在职及离退休民辅警持有效证件可享受\
                      专属团购价格，详情点击查看清单。"
                .to_string(),
            category: "生活福利".to_string(),
            created_at: now - 1_000_000,
            author: "后勤保障部".to_string(),
        },
    ]
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
