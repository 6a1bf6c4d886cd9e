#![forbid(unsafe_code)]

//! Result synthesis: the four canned verdicts shown in the result dialog.

use serde::Serialize;

use crate::status::IMBALANCE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Nothing on either pan.
    AbsoluteStagnation,
    IdealEquilibrium,
    /// Forces have outgrown the relations.
    RelationsObsolete,
    /// Relations run ahead of the forces.
    RelationsOverEngineered,
}

impl VerdictKind {
    #[must_use]
    pub fn verdict(self) -> &'static Verdict {
        match self {
            Self::AbsoluteStagnation => &ABSOLUTE_STAGNATION,
            Self::IdealEquilibrium => &IDEAL_EQUILIBRIUM,
            Self::RelationsObsolete => &RELATIONS_OBSOLETE,
            Self::RelationsOverEngineered => &RELATIONS_OVER_ENGINEERED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub title: &'static str,
    pub description: &'static str,
    pub advice: &'static str,
}

static ABSOLUTE_STAGNATION: Verdict = Verdict {
    kind: VerdictKind::AbsoluteStagnation,
    title: "SỰ TRÌ TRỆ TUYỆT ĐỐI",
    description: "Không có lực lượng sản xuất, không có quan hệ sản xuất. Xã hội (hoặc dự án của bạn) đang ở trạng thái đứng yên.",
    advice: "Hãy bắt đầu bằng việc nâng cấp kỹ năng (LLSX) hoặc xây dựng đội ngũ (QHSX).",
};

static IDEAL_EQUILIBRIUM: Verdict = Verdict {
    kind: VerdictKind::IdealEquilibrium,
    title: "ĐIỂM CÂN BẰNG LÝ TƯỞNG",
    description: "Lực lượng sản xuất và Quan hệ sản xuất đang 'đồng điệu'. Đây là trạng thái giúp năng suất lao động đạt mức cao nhất.",
    advice: "Duy trì sự phù hợp này, nhưng hãy nhớ LLSX luôn phát triển nhanh hơn. Đừng để hệ thống trở nên lỗi thời trong tương lai.",
};

static RELATIONS_OBSOLETE: Verdict = Verdict {
    kind: VerdictKind::RelationsObsolete,
    title: "MÂU THUẪN: QHSX LỖI THỜI",
    description: "Năng lực con người (LLSX) đã vượt xa khả năng quản lý và đãi ngộ (QHSX). 'Chiếc áo' cơ chế hiện tại đã quá chật.",
    advice: "Cần một cuộc 'cách mạng' trong quản lý: Tăng lương, áp dụng Agile, hoặc thay đổi văn hóa để giữ chân nhân tài.",
};

static RELATIONS_OVER_ENGINEERED: Verdict = Verdict {
    kind: VerdictKind::RelationsOverEngineered,
    title: "MÂU THUẪN: QHSX VƯỢT TRƯỚC HÌNH THỨC",
    description: "Hệ thống quản lý, đãi ngộ quá hào nhoáng nhưng năng lực thực tế của nhân sự chưa tới. Dẫn đến lãng phí nguồn lực.",
    advice: "Tập trung vào đào tạo (LLSX) để đuổi kịp hệ thống, hoặc tinh gọn bộ máy quản lý để tránh bệnh hình thức.",
};

/// Map pan sizes and difference to a verdict.
///
/// Checks run in order: empty pans, `|d| < 15`, `d > 15`, and everything
/// left over is over-engineered. That fall-through also catches `d == 15`,
/// which the status badge calls balanced.
#[must_use]
pub fn synthesize(left_count: usize, right_count: usize, difference: i32) -> &'static Verdict {
    let kind = if left_count == 0 && right_count == 0 {
        VerdictKind::AbsoluteStagnation
    } else if difference.abs() < IMBALANCE_THRESHOLD {
        VerdictKind::IdealEquilibrium
    } else if difference > IMBALANCE_THRESHOLD {
        VerdictKind::RelationsObsolete
    } else {
        VerdictKind::RelationsOverEngineered
    };
    kind.verdict()
}
