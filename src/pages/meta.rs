//! Document head tags

use crate::config::DEFAULT_SITE_URL;

pub const DEFAULT_TITLE: &str = "CineVisor";
pub const DEFAULT_DESCRIPTION: &str = "CineVisor는 최신 영화, 감독, 배우 정보를 한눈에 볼 수 있는 영화 정보 큐레이션 사이트입니다. 마음에 드는 영화를 북마크하고, 감각적인 UI로 영화를 탐색해보세요.";
pub const DEFAULT_KEYWORDS: &str =
    "CineVisor, 시네바이저, 영화, 영화 정보, 영화 추천, 인기 영화, 최신 영화, 영화 북마크, 배우, 감독";
pub const DEFAULT_IMAGE: &str = "/cvIcon.webp";
pub const DEFAULT_ROBOTS: &str = "index, follow";

/// Keywords for a single movie's page
pub fn detailed_keywords(title: &str) -> String {
    format!(
        "{title}, {title} 줄거리, {title} 출연진, {title} 평점, {title} 정보, {}",
        DEFAULT_KEYWORDS,
        title = title
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub image: String,
    pub url: String,
    pub robots: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            keywords: DEFAULT_KEYWORDS.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            url: format!("{}/", DEFAULT_SITE_URL),
            robots: DEFAULT_ROBOTS.to_string(),
        }
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Meta {
    /// Render the `<head>` fragment
    pub fn to_html(&self) -> String {
        let title = escape(&self.title);
        let description = escape(&self.description);
        let lines = [
            format!("<title>{}</title>", title),
            r#"<meta http-equiv="content-type" content="text/html; charset=utf-8" />"#.to_string(),
            r#"<meta name="viewport" content="width=device-width, initial-scale=1.0" />"#.to_string(),
            r#"<meta http-equiv="x-ua-compatible" content="IE=edge" />"#.to_string(),
            format!(r#"<meta name="robots" content="{}" />"#, escape(&self.robots)),
            format!(r#"<meta name="keywords" content="{}" />"#, escape(&self.keywords)),
            format!(r#"<meta name="description" content="{}" />"#, description),
            format!(r#"<meta property="og:title" content="{}" />"#, title),
            r#"<meta property="og:type" content="website" />"#.to_string(),
            format!(r#"<meta property="og:image" content="{}" />"#, escape(&self.image)),
            format!(r#"<meta property="og:url" content="{}" />"#, escape(&self.url)),
            format!(r#"<meta property="og:description" content="{}" />"#, description),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let meta = Meta::default();
        assert_eq!(meta.title, "CineVisor");
        assert_eq!(meta.image, "/cvIcon.webp");
        assert_eq!(meta.robots, "index, follow");
        assert_eq!(meta.url, "https://oz-react-mini-11-nine.vercel.app/");
    }

    #[test]
    fn test_to_html_escapes_values() {
        let meta = Meta {
            title: "Tom & Jerry | CineVisor".into(),
            ..Meta::default()
        };
        let html = meta.to_html();
        assert!(html.starts_with("<title>Tom &amp; Jerry | CineVisor</title>"));
        assert!(html.contains(r#"<meta property="og:image" content="/cvIcon.webp" />"#));
    }

    #[test]
    fn test_detailed_keywords_lead_with_title() {
        let keywords = detailed_keywords("기생충");
        assert!(keywords.starts_with("기생충, 기생충 줄거리"));
        assert!(keywords.ends_with(DEFAULT_KEYWORDS));
    }
}
