//! Built-in content used when durable storage has nothing usable.

use crate::models::{Comment, Identity, Post, Role, SiteConfig};

/// Storage key of the serialized [`SiteConfig`].
pub const SITE_CONFIG_KEY: &str = "siteConfig";
/// Storage key of the serialized post list.
pub const GALLERY_POSTS_KEY: &str = "galleryPosts";

/// The open-access identity every session starts with.
pub fn default_identity() -> Identity {
    Identity {
        id: "admin-guest".to_string(),
        name: "연구원 (Admin)".to_string(),
        email: "admin@samhwa.com".to_string(),
        role: Role::Admin,
        department: "R&BD Center".to_string(),
        level: 10,
        xp: 5000,
        max_xp: 6000,
    }
}

pub fn default_site_config() -> SiteConfig {
    SiteConfig {
        main_title: "R&BD AI 포털".to_string(),
        main_subtitle: "Samhwa Paint R&BD Center".to_string(),
        main_description: "연구와 업무에 바로 쓰는 생성형 AI 가이드, 템플릿, 자료실을 한 곳에서 만나보세요.".to_string(),
        notice_title: "[공지]".to_string(),
        notice_content: "AI 활용 사례 공모전이 진행 중입니다. 자랑하기 게시판에 경험을 공유해주세요.".to_string(),
        show_notice: true,
    }
}

pub fn default_gallery_posts() -> Vec<Post> {
    vec![
        Post {
            id: "seed-2".to_string(),
            title: "엑셀 수식 자동화로 주간 보고 시간 단축".to_string(),
            content: "ChatGPT에게 VLOOKUP과 피벗 구성을 물어보고 주간 실험 데이터 정리를 자동화했습니다. 매주 2시간이 절약됩니다.".to_string(),
            author: "김연구".to_string(),
            author_dept: "도료개발팀".to_string(),
            date: "2025. 1. 20.".to_string(),
            likes: 12,
            tags: vec!["엑셀".to_string(), "ChatGPT".to_string(), "시간단축".to_string()],
            image_url: None,
            comments: vec![Comment {
                id: "seed-2-c1".to_string(),
                author: "박선임".to_string(),
                text: "수식 공유 부탁드립니다!".to_string(),
                date: "2025. 1. 21.".to_string(),
            }],
        },
        Post {
            id: "seed-1".to_string(),
            title: "논문 요약 프롬프트 공유".to_string(),
            content: "영문 논문 초록을 붙여넣고 핵심 실험 조건만 표로 뽑아달라고 하면 검토 속도가 크게 빨라집니다.".to_string(),
            author: "이책임".to_string(),
            author_dept: "소재연구팀".to_string(),
            date: "2025. 1. 15.".to_string(),
            likes: 8,
            tags: vec!["논문".to_string(), "프롬프트".to_string()],
            image_url: None,
            comments: Vec::new(),
        },
    ]
}
