//! 文档导出 - 业务能力层
//!
//! 把分组后的结果排版为分页文档：
//! 1. 封面（标题、署名、鼓励语、筛选条件摘要、使用限制说明）
//! 2. 按 科目 → 知识点 输出题目，自动换行、自动分页
//! 3. 排版完成后给每一页叠加斜向水印和页脚（生成时间 + 第 X 页 / 共 N 页）

use crate::config::Config;
use crate::error::ExportError;
use crate::infrastructure::pdf_canvas::{
    text_width_mm, FontStyle, PdfCanvas, PlacedText, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PT_TO_MM,
};
use crate::models::selection::{Facet, SelectionState};
use crate::services::export_grouper::ExportGrouping;
use crate::services::text_cleaner::TextCleaner;
use chrono::{DateTime, Local};
use tracing::{debug, info};

const MARGIN_X: f32 = 15.0;
const MARGIN_TOP: f32 = 20.0;
/// 正文可用的最低位置，再往下留给页脚
const CONTENT_BOTTOM: f32 = 275.0;
const FOOTER_Y: f32 = 289.0;
const PRINTABLE_WIDTH: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_X;
const LINE_SPACING: f32 = 1.25;

const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 12.0;
const SECTION_SIZE: f32 = 14.0;
const SUBJECT_SIZE: f32 = 16.0;
const TOPIC_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 11.0;
const META_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 8.0;
const WATERMARK_SIZE: f32 = 60.0;
const WATERMARK_ANGLE: f32 = 45.0;
const WATERMARK_OPACITY: f32 = 0.08;

/// 题目续行的缩进
const HANG_INDENT: f32 = 5.0;

const ENCOURAGEMENT: &str = "Every question you practise today is one less surprise on exam day. \
Work through them steadily, review your mistakes, and keep going!";
const USAGE_NOTE: &str = "For personal study use only. Redistribution, resale or commercial use \
of this document is not permitted.";

/// 导出选项
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub title: String,
    pub attribution: String,
    pub watermark_text: String,
}

impl From<&Config> for ExportOptions {
    fn from(config: &Config) -> Self {
        Self {
            title: config.export_title.clone(),
            attribution: config.export_attribution.clone(),
            watermark_text: config.watermark_text.clone(),
        }
    }
}

/// 封面上的筛选条件摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    /// (名称, 取值)，未激活的分面取值为 "All"
    pub lines: Vec<(&'static str, String)>,
    pub total_questions: usize,
}

impl FilterSummary {
    pub fn from_selection(selection: &SelectionState, total_questions: usize) -> Self {
        let facet_line = |facet: Facet| {
            let values = selection.selected(facet);
            let rendered = if values.is_empty() {
                "All".to_string()
            } else {
                values.join(", ")
            };
            (facet.label(), rendered)
        };

        Self {
            lines: vec![
                facet_line(Facet::Subject),
                facet_line(Facet::Year),
                facet_line(Facet::Exam),
                ("Marks", selection.marks.to_string()),
                facet_line(Facet::Topic),
                facet_line(Facet::Subtopic),
            ],
            total_questions,
        }
    }
}

/// 排版结果：每页的文本项
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub pages: Vec<Vec<PlacedText>>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 某一页上全部文本（按绘制顺序）
    pub fn page_texts(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|items| items.iter().map(|i| i.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// 文档导出器
pub struct DocumentExporter {
    options: ExportOptions,
    cleaner: TextCleaner,
}

impl DocumentExporter {
    pub fn new(options: ExportOptions) -> Result<Self, ExportError> {
        Ok(Self {
            options,
            cleaner: TextCleaner::new()?,
        })
    }

    /// 导出为 PDF 字节，时间戳取当前时间
    pub fn export(
        &self,
        grouping: &ExportGrouping<'_>,
        summary: &FilterSummary,
    ) -> Result<Vec<u8>, ExportError> {
        self.export_at(grouping, summary, Local::now())
    }

    pub fn export_at(
        &self,
        grouping: &ExportGrouping<'_>,
        summary: &FilterSummary,
        generated_at: DateTime<Local>,
    ) -> Result<Vec<u8>, ExportError> {
        let layout = self.layout(grouping, summary, generated_at);
        info!(
            "📄 导出排版完成: {} 个科目, {} 道题, {} 页",
            grouping.subjects.len(),
            grouping.question_count(),
            layout.page_count()
        );

        PdfCanvas::new(&self.options.title, WATERMARK_OPACITY).render(&layout.pages)
    }

    /// 排版（不生成 PDF）
    pub fn layout(
        &self,
        grouping: &ExportGrouping<'_>,
        summary: &FilterSummary,
        generated_at: DateTime<Local>,
    ) -> DocumentLayout {
        let mut cursor = LayoutCursor::new();

        self.layout_cover(&mut cursor, summary);

        if !grouping.is_empty() {
            cursor.new_page();
            self.layout_content(&mut cursor, grouping);
        }

        let mut layout = cursor.finish();
        self.overlay(&mut layout, generated_at);
        layout
    }

    fn layout_cover(&self, cursor: &mut LayoutCursor, summary: &FilterSummary) {
        cursor.skip(30.0);
        cursor.centered(&self.options.title, TITLE_SIZE, FontStyle::Bold);
        cursor.skip(2.0);
        cursor.centered(&self.options.attribution, SUBTITLE_SIZE, FontStyle::Italic);
        cursor.skip(10.0);

        let encouragement = wrap_text(
            ENCOURAGEMENT,
            PRINTABLE_WIDTH - 20.0,
            SUBTITLE_SIZE,
            FontStyle::Regular,
        );
        for line in encouragement {
            cursor.centered(&line, SUBTITLE_SIZE, FontStyle::Regular);
        }
        cursor.skip(12.0);

        cursor.paragraph("Applied filters", MARGIN_X, 0.0, SECTION_SIZE, FontStyle::Bold);
        cursor.skip(2.0);
        for (label, value) in &summary.lines {
            let text = format!("{}: {}", label, value);
            cursor.paragraph(&text, MARGIN_X + 3.0, HANG_INDENT, BODY_SIZE, FontStyle::Regular);
        }
        let total = format!("Total questions: {}", summary.total_questions);
        cursor.paragraph(&total, MARGIN_X + 3.0, HANG_INDENT, BODY_SIZE, FontStyle::Regular);

        cursor.skip(14.0);
        cursor.paragraph(USAGE_NOTE, MARGIN_X, 0.0, META_SIZE, FontStyle::Italic);
    }

    fn layout_content(&self, cursor: &mut LayoutCursor, grouping: &ExportGrouping<'_>) {
        for (si, subject) in grouping.subjects.iter().enumerate() {
            if si > 0 {
                cursor.skip(6.0);
            }
            // 标题不单独留在页底
            cursor.ensure(
                line_height(SUBJECT_SIZE) + line_height(TOPIC_SIZE) + line_height(BODY_SIZE),
            );
            cursor.paragraph(&subject.subject, MARGIN_X, 0.0, SUBJECT_SIZE, FontStyle::Bold);

            let mut number = 0;
            for topic in &subject.topics {
                cursor.skip(2.0);
                cursor.ensure(line_height(TOPIC_SIZE) + line_height(BODY_SIZE));
                cursor.paragraph(&topic.topic, MARGIN_X + 2.0, 0.0, TOPIC_SIZE, FontStyle::Bold);
                cursor.skip(1.0);

                for q in &topic.questions {
                    number += 1;
                    let cleaned = self.cleaner.clean(&q.question);
                    let marker = format!("{}. ", number);
                    let x = MARGIN_X + 4.0;

                    for (pi, para) in cleaned.split('\n').enumerate() {
                        let text = if pi == 0 {
                            format!("{}{}", marker, para)
                        } else {
                            para.to_string()
                        };
                        let first_indent = if pi == 0 { 0.0 } else { HANG_INDENT };
                        cursor.paragraph_indented(
                            &text,
                            x,
                            first_indent,
                            HANG_INDENT,
                            BODY_SIZE,
                            FontStyle::Regular,
                        );
                    }

                    let meta = format!("(Year: {} | Marks: {})", q.year, q.marks);
                    cursor.line(
                        PlacedText::new(x + HANG_INDENT, 0.0, META_SIZE, FontStyle::Italic, meta)
                            .gray(0.35),
                    );
                    cursor.skip(3.0);
                }
            }
        }
    }

    /// 水印和页脚在全部内容排完后统一叠加，页脚才能知道总页数
    fn overlay(&self, layout: &mut DocumentLayout, generated_at: DateTime<Local>) {
        let total = layout.pages.len();
        let timestamp = format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
        let watermark = self.watermark();

        for (i, page) in layout.pages.iter_mut().enumerate() {
            if let Some(mark) = &watermark {
                page.push(mark.clone());
            }

            page.push(
                PlacedText::new(
                    MARGIN_X,
                    FOOTER_Y,
                    FOOTER_SIZE,
                    FontStyle::Regular,
                    timestamp.clone(),
                )
                .gray(0.4),
            );

            let numbering = format!("Page {} of {}", i + 1, total);
            let width = text_width_mm(&numbering, FOOTER_SIZE, FontStyle::Regular);
            page.push(
                PlacedText::new(
                    PAGE_WIDTH_MM - MARGIN_X - width,
                    FOOTER_Y,
                    FOOTER_SIZE,
                    FontStyle::Regular,
                    numbering,
                )
                .gray(0.4),
            );
        }

        debug!("已为 {} 页添加水印和页脚", total);
    }

    fn watermark(&self) -> Option<PlacedText> {
        let text = self.options.watermark_text.trim();
        if text.is_empty() {
            return None;
        }

        // 以页面中心为旋转后文本的中点
        let width = text_width_mm(text, WATERMARK_SIZE, FontStyle::Bold);
        let (sin, cos) = WATERMARK_ANGLE.to_radians().sin_cos();
        let x = PAGE_WIDTH_MM / 2.0 - width / 2.0 * cos;
        let y = PAGE_HEIGHT_MM / 2.0 + width / 2.0 * sin;

        Some(
            PlacedText::new(x, y, WATERMARK_SIZE, FontStyle::Bold, text)
                .rotated(WATERMARK_ANGLE)
                .gray(0.5)
                .translucent(),
        )
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// 排版游标：记录当前页和纵向位置，空间不足时自动换页
struct LayoutCursor {
    pages: Vec<Vec<PlacedText>>,
    y: f32,
}

impl LayoutCursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: MARGIN_TOP,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = MARGIN_TOP;
    }

    fn skip(&mut self, mm: f32) {
        self.y += mm;
    }

    /// 剩余空间不足 `height` 时换页
    fn ensure(&mut self, height: f32) {
        if self.y + height > CONTENT_BOTTOM {
            self.new_page();
        }
    }

    /// 放置一行，`item.y` 由游标决定
    fn line(&mut self, mut item: PlacedText) {
        let height = line_height(item.size);
        self.ensure(height);
        item.y = self.y + height * 0.8;
        self.y += height;
        if let Some(page) = self.pages.last_mut() {
            page.push(item);
        }
    }

    /// 居中输出，超出可打印宽度时先换行
    fn centered(&mut self, text: &str, size: f32, style: FontStyle) {
        for line in wrap_text(text, PRINTABLE_WIDTH, size, style) {
            let width = text_width_mm(&line, size, style);
            let x = ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_X);
            self.line(PlacedText::new(x, 0.0, size, style, line));
        }
    }

    fn paragraph(&mut self, text: &str, x: f32, hang: f32, size: f32, style: FontStyle) {
        self.paragraph_indented(text, x, 0.0, hang, size, style);
    }

    /// 自动换行输出一段文本；首行缩进 `first`，续行缩进 `hang`
    fn paragraph_indented(
        &mut self,
        text: &str,
        x: f32,
        first: f32,
        hang: f32,
        size: f32,
        style: FontStyle,
    ) {
        let right = PAGE_WIDTH_MM - MARGIN_X;
        let first_width = right - x - first;
        let rest_width = right - x - hang;

        let lines = wrap_text_with(text, size, style, |index| {
            if index == 0 {
                first_width
            } else {
                rest_width
            }
        });
        for (index, line) in lines.into_iter().enumerate() {
            let indent = if index == 0 { first } else { hang };
            self.line(PlacedText::new(x + indent, 0.0, size, style, line));
        }
    }

    fn finish(self) -> DocumentLayout {
        DocumentLayout { pages: self.pages }
    }
}

/// 贪心按词换行；单个词超宽时按字符拆开
pub fn wrap_text(text: &str, max_width: f32, size: f32, style: FontStyle) -> Vec<String> {
    wrap_text_with(text, size, style, |_| max_width)
}

/// 同 [`wrap_text`]，但每一行的可用宽度由 `width_of(行号)` 给出
pub fn wrap_text_with<F>(text: &str, size: f32, style: FontStyle, width_of: F) -> Vec<String>
where
    F: Fn(usize) -> f32,
{
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width_mm(&candidate, size, style) <= width_of(lines.len()) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width_mm(word, size, style) <= width_of(lines.len()) {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            let too_wide = text_width_mm(&current, size, style) > width_of(lines.len());
            if too_wide && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
