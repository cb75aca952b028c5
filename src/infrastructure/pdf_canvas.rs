//! PDF 画布 - 基础设施层
//!
//! 唯一接触 lopdf 的地方：把排好版的文本项写成 PDF 字节，不认识 Question

use crate::error::ExportError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

/// A4 页面尺寸（毫米）
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const MM_TO_PT: f32 = 72.0 / 25.4;
/// 字号（磅）换算为毫米
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// 字体样式，对应 PDF 标准 14 字体中的 Helvetica 系列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }
}

/// 页面上的一段文本
///
/// 坐标以毫米为单位、原点在页面左上角，`y` 是基线位置
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
    pub text: String,
    /// 逆时针旋转角度
    pub rotation_deg: f32,
    /// 灰度，0 为黑色
    pub gray: f32,
    /// 是否使用半透明图形状态
    pub translucent: bool,
}

impl PlacedText {
    pub fn new(x: f32, y: f32, size: f32, style: FontStyle, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            style,
            text: text.into(),
            rotation_deg: 0.0,
            gray: 0.0,
            translucent: false,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation_deg = degrees;
        self
    }

    pub fn gray(mut self, level: f32) -> Self {
        self.gray = level;
        self
    }

    pub fn translucent(mut self) -> Self {
        self.translucent = true;
        self
    }
}

// Helvetica 字宽表（1/1000 em），覆盖 ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const DEFAULT_GLYPH_WIDTH: u16 = 556;
// Helvetica-Bold 整体略宽，按比例估算
const BOLD_WIDTH_FACTOR: f32 = 1.08;

/// 估算文本宽度（毫米）
pub fn text_width_mm(text: &str, size: f32, style: FontStyle) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                u32::from(DEFAULT_GLYPH_WIDTH)
            }
        })
        .sum();

    let factor = if style == FontStyle::Bold {
        BOLD_WIDTH_FACTOR
    } else {
        1.0
    };
    units as f32 / 1000.0 * size * PT_TO_MM * factor
}

/// 按 WinAnsi 编码输出文本字节，无法表示的字符替换为 '?'
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => bytes.push(b'-'),
            '\u{2018}' | '\u{2019}' => bytes.push(b'\''),
            '\u{201C}' | '\u{201D}' => bytes.push(b'"'),
            '\u{2192}' => bytes.extend_from_slice(b"->"),
            '\t' => bytes.push(b' '),
            c if (c as u32) >= 0x20 && (c as u32) <= 0x7E => bytes.push(c as u8),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => bytes.push(c as u32 as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

/// PDF 画布
pub struct PdfCanvas {
    title: String,
    /// 半透明文本的不透明度
    opacity: f32,
}

impl PdfCanvas {
    pub fn new(title: impl Into<String>, opacity: f32) -> Self {
        Self {
            title: title.into(),
            opacity,
        }
    }

    /// 把每页的文本项渲染为 PDF 字节
    pub fn render(&self, pages: &[Vec<PlacedText>]) -> Result<Vec<u8>, ExportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let italic_id = doc.add_object(font_dictionary("Helvetica-Oblique"));
        let gs_id = doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => self.opacity,
            "CA" => self.opacity,
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
                "F3" => italic_id,
            },
            "ExtGState" => dictionary! {
                "GS1" => gs_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for items in pages {
            let content: Content = Content {
                operations: items.iter().flat_map(text_operations).collect(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.0_f32.into(),
                0.0_f32.into(),
                (PAGE_WIDTH_MM * MM_TO_PT).into(),
                (PAGE_HEIGHT_MM * MM_TO_PT).into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(&self.title), StringFormat::Literal),
            "Producer" => Object::string_literal(concat!("pyq_explorer ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        debug!("PDF 渲染完成: {} 页, {} 字节", page_count, bytes.len());
        Ok(bytes)
    }
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_operations(item: &PlacedText) -> Vec<Operation> {
    let (sin, cos) = item.rotation_deg.to_radians().sin_cos();
    let x = item.x * MM_TO_PT;
    let y = (PAGE_HEIGHT_MM - item.y) * MM_TO_PT;

    let mut ops = vec![Operation::new("q", vec![])];
    if item.translucent {
        ops.push(Operation::new("gs", vec!["GS1".into()]));
    }
    ops.extend([
        Operation::new("g", vec![item.gray.into()]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![item.style.resource_name().into(), item.size.into()]),
        Operation::new(
            "Tm",
            vec![
                cos.into(),
                sin.into(),
                (-sin).into(),
                cos.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&item.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]);
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_scales_with_size() {
        let small = text_width_mm("Hello", 10.0, FontStyle::Regular);
        let large = text_width_mm("Hello", 20.0, FontStyle::Regular);
        assert!((large - small * 2.0).abs() < 1e-4);
        assert!(text_width_mm("Hello", 10.0, FontStyle::Bold) > small);
        assert!(text_width_mm("iii", 10.0, FontStyle::Regular) < text_width_mm("WWW", 10.0, FontStyle::Regular));
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("a – b"), b"a - b".to_vec());
        assert_eq!(encode_win_ansi("x → y"), b"x -> y".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("热"), b"?".to_vec());
    }

    #[test]
    fn test_render_page_count() {
        let canvas = PdfCanvas::new("Test", 0.1);
        let pages = vec![
            vec![PlacedText::new(15.0, 20.0, 12.0, FontStyle::Regular, "First (page)")],
            vec![PlacedText::new(105.0, 148.0, 40.0, FontStyle::Bold, "Mark")
                .rotated(45.0)
                .gray(0.5)
                .translucent()],
        ];

        let bytes = canvas.render(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
