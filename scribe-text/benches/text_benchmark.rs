use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scribe_text::{
    AtlasConfig, FixedRasterizer, FontFamily, FontType, GlyphAtlas, RasterizedGlyph, Text,
    TextConfig, TextStyle,
};

const PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog. \
    Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
    Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

fn family() -> FontFamily {
    FontFamily::new(FixedRasterizer::new(), AtlasConfig::default())
}

fn bench_set_short_text(c: &mut Criterion) {
    let mut fonts = family();
    let mut text = Text::default();

    c.bench_function("set_short_text", |b| {
        b.iter(|| text.set_text(&mut fonts, black_box("Hello, Scribe!")));
    });
}

fn bench_set_wrapped_paragraph(c: &mut Criterion) {
    let mut fonts = family();
    let mut text = Text::new(TextConfig {
        size: 14,
        auto_wrap: true,
        custom_wrap_width: Some(400.0),
        ..Default::default()
    });

    c.bench_function("set_wrapped_paragraph", |b| {
        b.iter(|| text.set_text(&mut fonts, black_box(PARAGRAPH)));
    });
}

fn bench_styled_paragraph(c: &mut Criterion) {
    let mut fonts = family();
    let mut text = Text::default();
    text.add_text_style(&mut fonts, TextStyle::new("b", FontType::Bold, 18));
    let styled = format!("<b>{PARAGRAPH}</> {PARAGRAPH}");

    c.bench_function("set_styled_paragraph", |b| {
        b.iter(|| text.set_text(&mut fonts, black_box(&styled)));
    });
}

fn bench_append_char(c: &mut Criterion) {
    let mut fonts = family();
    let mut text = Text::default();
    text.set_text(&mut fonts, PARAGRAPH);

    c.bench_function("append_char_to_paragraph", |b| {
        b.iter(|| {
            let len = text.text_size(false);
            let _ = text.add_char(&mut fonts, len, black_box('x'));
            let _ = text.remove_char(&mut fonts, len);
        });
    });
}

fn bench_atlas_insert(c: &mut Criterion) {
    let glyph = RasterizedGlyph {
        width: 16,
        height: 16,
        pitch: 16,
        bearing_x: 0,
        bearing_y: 16,
        advance: 16,
        pixels: vec![200u8; 16 * 16],
    };

    c.bench_function("atlas_insert_16x16", |b| {
        let mut atlas = GlyphAtlas::new(AtlasConfig {
            width: 1024,
            height: 1024,
            ..Default::default()
        });
        b.iter(|| {
            if atlas.insert(black_box(&glyph), 0).is_err() {
                atlas.clear();
            }
        });
    });
}

fn bench_glyph_lookup(c: &mut Criterion) {
    let mut fonts = family();
    for cp in ' '..='~' {
        fonts.create_char(FontType::Regular, 16, cp);
    }

    c.bench_function("glyph_lookup", |b| {
        let mut cp = 0u32;
        b.iter(|| {
            cp = (cp + 1) % 95;
            let ch = char::from_u32(32 + cp).unwrap_or(' ');
            fonts.find_or_create(FontType::Regular, 16, black_box(ch));
        });
    });
}

criterion_group!(
    benches,
    bench_set_short_text,
    bench_set_wrapped_paragraph,
    bench_styled_paragraph,
    bench_append_char,
    bench_atlas_insert,
    bench_glyph_lookup,
);
criterion_main!(benches);
