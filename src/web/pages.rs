// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Page templates

use crate::domain::config::MetaContent;
use crate::domain::user::LoginUser;
use askama::Template;

/// Pages served by name from `/<page>`.
pub const SIMPLE_PAGES: [&str; 8] = [
    "PrivacyStatement",
    "TermsOfUse",
    "error",
    "submitted",
    "redirect",
    "notregister",
    "challenges",
    "help",
];

pub fn is_simple_page(page: &str) -> bool {
    SIMPLE_PAGES.contains(&page)
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub providers: Vec<String>,
    pub meta: MetaContent,
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsPage {
    pub user: LoginUser,
    pub meta: MetaContent,
}

#[derive(Template)]
#[template(path = "hackathon.html")]
pub struct HackathonPage {
    pub user: LoginUser,
    pub meta: MetaContent,
}

#[derive(Template)]
#[template(path = "simple.html")]
pub struct SimplePage {
    pub page: String,
    pub meta: MetaContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> MetaContent {
        MetaContent {
            weibo: "wb-meta".to_string(),
            qq: "qq-meta".to_string(),
        }
    }

    #[test]
    fn test_index_lists_providers() {
        let html = IndexPage {
            providers: vec!["github".to_string(), "qq".to_string()],
            meta: meta(),
        }
        .render()
        .unwrap();
        assert!(html.contains("href=\"/github\""));
        assert!(html.contains("href=\"/qq\""));
        assert!(!html.contains("href=\"/weibo\""));
        assert!(html.contains("qq-meta"));
    }

    #[test]
    fn test_every_simple_page_renders() {
        for page in SIMPLE_PAGES {
            let html = SimplePage {
                page: page.to_string(),
                meta: meta(),
            }
            .render()
            .unwrap();
            assert!(html.contains(&format!("data-page=\"{}\"", page)), "{}", page);
        }
    }
}
