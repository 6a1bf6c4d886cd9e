#![forbid(unsafe_code)]

//! Static factor catalog.
//!
//! Two fixed palettes of weighted factors (production forces for the left
//! pan, production relations for the right pan) plus a short list of facts
//! the rendering surface shows alongside the scale. Everything here is
//! `'static` and never mutated; placing a factor copies a reference to the
//! catalog entry into a pan.

use serde::Serialize;

use crate::pan::Side;

/// Which half of the lesson a factor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Skills, tools, human capability (LLSX).
    ProductionForces,
    /// Pay, process, organisational culture (QHSX).
    ProductionRelations,
}

impl Category {
    /// The only pan that accepts factors of this category.
    #[inline]
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::ProductionForces => Side::Left,
            Self::ProductionRelations => Side::Right,
        }
    }

    /// Short lesson code shown on palette headers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ProductionForces => "LLSX",
            Self::ProductionRelations => "QHSX",
        }
    }
}

/// A catalog item that can be dropped onto a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Factor {
    /// Stable catalog id (`l-*` for forces, `q-*` for relations).
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Contribution to the pan total. May be negative.
    pub weight: i32,
    pub category: Category,
    /// Display glyph.
    pub icon: &'static str,
    pub tooltip: &'static str,
}

/// An informational fact shown next to the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub id: u32,
    pub content: &'static str,
    pub source: &'static str,
}

const fn forces(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    weight: i32,
    icon: &'static str,
    tooltip: &'static str,
) -> Factor {
    Factor {
        id,
        name,
        description,
        weight,
        category: Category::ProductionForces,
        icon,
        tooltip,
    }
}

const fn relations(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    weight: i32,
    icon: &'static str,
    tooltip: &'static str,
) -> Factor {
    Factor {
        id,
        name,
        description,
        weight,
        category: Category::ProductionRelations,
        icon,
        tooltip,
    }
}

static FORCES: [Factor; 8] = [
    forces("l-1", "Intern Logic", "Cơ bản, mới bắt đầu", 5, "🐣", "Sức lao động sơ khai."),
    forces("l-2", "Senior Architect", "Thiết kế hệ thống lớn", 40, "🏗️", "LLSX trình độ cao."),
    forces("l-3", "AI Mastery", "Tối ưu hóa bằng AI", 35, "🧬", "Trí tuệ cách mạng."),
    forces("l-4", "Cloud Expert", "AWS/Azure/GCP", 25, "☁️", "Công cụ số hiện đại."),
    forces("l-5", "Nhiệt huyết FPT", "Tinh thần \"FPT-er\"", 15, "🔥", "Yếu tố con người quyết định."),
    forces("l-6", "IELTS 7.5+", "Năng lực hội nhập", 20, "🌍", "Mở rộng phạm vi LLSX."),
    forces("l-7", "Java/C# Hard-core", "Kỹ năng cốt lõi", 30, "💻", "Công cụ lao động kỹ thuật."),
    forces("l-8", "Tiếng Nhật N2", "Thị trường Nhật Bản", 18, "🗾", "Kỹ năng chuyên biệt."),
];

static RELATIONS: [Factor; 8] = [
    relations("q-1", "Lương 5 Triệu", "Phân phối lạc hậu", 5, "🍜", "Kìm hãm con người."),
    relations("q-2", "Lương Senior USD", "Đãi ngộ xứng tầm", 45, "💰", "Phân phối hiện đại."),
    relations("q-3", "Micro-management", "Quản lý gò bó", -15, "👁️", "Quan hệ quản lý lỗi thời."),
    relations("q-4", "Quy trình Agile", "Linh hoạt, tự chủ", 25, "🌀", "Hình thức tổ chức tiến bộ."),
    relations("q-5", "Thưởng Performance", "Khuyến khích nỗ lực", 20, "🏆", "Quan hệ phân phối động lực."),
    relations("q-6", "Career Path", "Lộ trình thăng tiến", 30, "🚀", "Định hướng phát triển."),
    relations("q-7", "Văn hóa Creative", "Tự do sáng tạo", 22, "🎨", "Môi trường lý tưởng."),
    relations("q-8", "OKR Framework", "Quản trị theo mục tiêu", 15, "🎯", "Tổ chức quản lý chuẩn quốc tế."),
];

static FACTS: [Fact; 3] = [
    Fact {
        id: 1,
        content: "LLSX quyết định QHSX. Khi LLSX thay đổi, QHSX sớm muộn cũng phải thay đổi theo.",
        source: "Nguyên lý Triết học",
    },
    Fact {
        id: 2,
        content: "Nếu QHSX 'vượt trước' trình độ LLSX quá xa, nó sẽ dẫn đến bệnh hình thức và lãng phí.",
        source: "Kinh nghiệm thực tiễn",
    },
    Fact {
        id: 3,
        content: "Mâu thuẫn giữa LLSX và QHSX là động lực của mọi cuộc cách mạng xã hội.",
        source: "Học thuyết Mác-Lênin",
    },
];

/// Palette for the left pan.
#[inline]
#[must_use]
pub fn forces_factors() -> &'static [Factor] {
    &FORCES
}

/// Palette for the right pan.
#[inline]
#[must_use]
pub fn relations_factors() -> &'static [Factor] {
    &RELATIONS
}

#[inline]
#[must_use]
pub fn facts() -> &'static [Fact] {
    &FACTS
}

/// Look up a catalog entry by its stable id across both palettes.
#[must_use]
pub fn find_factor(id: &str) -> Option<&'static Factor> {
    FORCES.iter().chain(RELATIONS.iter()).find(|f| f.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palettes_are_homogeneous() {
        assert!(
            forces_factors()
                .iter()
                .all(|f| f.category == Category::ProductionForces)
        );
        assert!(
            relations_factors()
                .iter()
                .all(|f| f.category == Category::ProductionRelations)
        );
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<&str> = forces_factors()
            .iter()
            .chain(relations_factors())
            .map(|f| f.id)
            .collect();
        assert_eq!(ids.len(), forces_factors().len() + relations_factors().len());
    }

    #[test]
    fn find_factor_resolves_both_palettes() {
        assert_eq!(find_factor("l-2").map(|f| f.weight), Some(40));
        assert_eq!(find_factor("q-3").map(|f| f.weight), Some(-15));
        assert!(find_factor("x-9").is_none());
    }

    #[test]
    fn category_maps_to_expected_side() {
        assert_eq!(Category::ProductionForces.side(), Side::Left);
        assert_eq!(Category::ProductionRelations.side(), Side::Right);
    }

    #[test]
    fn facts_are_numbered_from_one() {
        let ids: Vec<u32> = facts().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn factor_serializes_with_snake_case_category() {
        let json = serde_json::to_value(find_factor("l-1").unwrap()).unwrap();
        assert_eq!(json["category"], "production_forces");
        assert_eq!(json["weight"], 5);
    }
}
