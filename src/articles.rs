use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleCategory {
    Nutrition,
    Movement,
    Sleep,
    Care,
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 4] = [Self::Nutrition, Self::Movement, Self::Sleep, Self::Care];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Nutrition => "nutrisi",
            Self::Movement => "gerak",
            Self::Sleep => "tidur",
            Self::Care => "perawatan",
        }
    }
}

impl fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown category \"{0}\". Use all, nutrisi, gerak, tidur or perawatan.")]
pub struct UnknownCategory(String);

/// Category selector where `all` matches every article.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ArticleCategory),
}

impl CategoryFilter {
    fn matches(&self, category: ArticleCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s.is_empty() || s == "all" {
            return Ok(Self::All);
        }

        ArticleCategory::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .map(Self::Only)
            .ok_or(UnknownCategory(s))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Article {
    pub id: &'static str,
    pub title: &'static str,
    pub category: ArticleCategory,
    pub content: &'static str,
}

impl Article {
    fn mentions(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term) || self.content.to_lowercase().contains(term)
    }
}

pub static ARTICLES: [Article; 4] = [
    Article {
        id: "1",
        title: "Manfaat Konsumsi Air Putih Cukup",
        category: ArticleCategory::Nutrition,
        content: "Cukupan asupan air putih memegang peranan krusial bagi optimalnya fungsi tubuh secara menyeluruh, jauh melampaui sekadar pelepas dahaga. Dengan terhidrasi dengan baik, Anda membantu menjaga keseimbangan cairan tubuh yang vital untuk transportasi nutrisi, pengaturan suhu tubuh, dan pelumas sendi. Konsumsi air yang cukup juga mendukung fungsi kognitif yang optimal, meningkatkan konsentrasi, daya ingat, dan suasana hati, serta mencegah kelelahan. Minum air putih yang cukup setiap hari adalah investasi sederhana untuk kesehatan jangka panjang.",
    },
    Article {
        id: "2",
        title: "Panduan Olahraga Ringan di Rumah",
        category: ArticleCategory::Movement,
        content: "Olahraga ringan di rumah adalah cara yang bagus untuk menjaga kebugaran tanpa perlu peralatan mahal atau pergi ke gym. Mulailah dengan pemanasan 5-10 menit seperti jalan di tempat atau peregangan dinamis. Kemudian, lakukan gerakan sederhana seperti squat, lunges, push-up, plank, dan jumping jack, masing-masing 10-15 repetisi, ulangi 2-3 set. Akhiri dengan peregangan statis. Konsistensi adalah kunci, jadi usahakan berolahraga 3-4 kali seminggu.",
    },
    Article {
        id: "3",
        title: "Tips Meningkatkan Kualitas Tidur Anda",
        category: ArticleCategory::Sleep,
        content: "Tidur yang berkualitas penting untuk kesehatan fisik dan mental. Jaga jadwal tidur yang teratur, bahkan di akhir pekan, dan ciptakan kamar tidur yang gelap, tenang, dan sejuk. Hindari kafein dan alkohol menjelang waktu tidur, serta batasi paparan layar gawai setidaknya satu jam sebelum tidur. Aktivitas relaksasi seperti membaca buku atau mandi air hangat juga membantu tidur nyenyak.",
    },
    Article {
        id: "4",
        title: "Kebersihan Diri dan Lingkungan",
        category: ArticleCategory::Care,
        content: "Kesehatan optimal berakar pada kebersihan diri maupun lingkungan. Mencuci tangan dengan sabun, mandi teratur, dan menjaga kebersihan mulut melindungi kita dari kuman dan infeksi. Menjaga kebersihan rumah, mengelola sampah, dan membersihkan area lembap seperti kamar mandi mencegah penumpukan bakteri, virus, dan hama.",
    },
];

const DAILY_TIPS: [&str; 5] = [
    "Minumlah setidaknya 8 gelas air putih setiap hari.",
    "Luangkan 30 menit untuk bergerak aktif hari ini.",
    "Tidur 7-9 jam setiap malam membantu tubuh pulih.",
    "Perbanyak sayur dan buah di setiap waktu makan.",
    "Cuci tangan dengan sabun sebelum makan.",
];

pub fn find(id: &str) -> Option<&'static Article> {
    ARTICLES.iter().find(|article| article.id == id.trim())
}

/// Articles in `category` whose title or content contains `search`, ignoring case.
/// An empty search matches everything.
pub fn filter(category: CategoryFilter, search: &str) -> Vec<&'static Article> {
    let term = search.trim().to_lowercase();
    ARTICLES
        .iter()
        .filter(|article| category.matches(article.category))
        .filter(|article| term.is_empty() || article.mentions(&term))
        .collect()
}

/// Tip of the day, rotating through the tip list by calendar date.
pub fn daily_tip(date: NaiveDate) -> &'static str {
    let index = date.num_days_from_ce().rem_euclid(DAILY_TIPS.len() as i32) as usize;
    DAILY_TIPS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::today;

    fn ids(articles: Vec<&Article>) -> Vec<&str> {
        articles.into_iter().map(|article| article.id).collect()
    }

    #[test]
    fn all_filter_matches_every_article() {
        assert_eq!(ids(filter(CategoryFilter::All, "")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn category_filter_narrows_results() {
        let filter_by: CategoryFilter = "tidur".parse().unwrap();

        assert_eq!(ids(filter(filter_by, "")), vec!["3"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        assert_eq!(ids(filter(CategoryFilter::All, "OLAHRAGA")), vec!["2"]);
        assert_eq!(ids(filter(CategoryFilter::All, "kafein")), vec!["3"]);
    }

    #[test]
    fn category_and_search_combine() {
        let nutrition = CategoryFilter::Only(ArticleCategory::Nutrition);

        assert!(filter(nutrition, "kafein").is_empty());
    }

    #[test]
    fn parses_category_filters() {
        assert_eq!("ALL".parse(), Ok(CategoryFilter::All));
        assert_eq!("".parse(), Ok(CategoryFilter::All));
        assert_eq!(
            " Perawatan ".parse(),
            Ok(CategoryFilter::Only(ArticleCategory::Care))
        );
        assert_eq!(
            "gizi".parse::<CategoryFilter>(),
            Err(UnknownCategory("gizi".to_string()))
        );
    }

    #[test]
    fn finds_article_by_id() {
        assert_eq!(find("2").map(|a| a.title), Some("Panduan Olahraga Ringan di Rumah"));
        assert!(find("9").is_none());
    }

    #[test]
    fn daily_tip_is_stable_within_a_day_and_rotates() {
        let tomorrow = today().succ_opt().unwrap();

        assert_eq!(daily_tip(today()), daily_tip(today()));
        assert_ne!(daily_tip(today()), daily_tip(tomorrow));
    }
}
