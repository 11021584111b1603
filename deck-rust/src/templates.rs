use crate::Template;

const SANS_STACK: &str = "'Noto Sans SC', 'Microsoft YaHei', sans-serif";

static TEMPLATES: [Template; 5] = [
    Template {
        id: "business",
        name: "Business Professional",
        description: "Deep blue palette with a clean, professional business look",
        colors: &["#0a1628", "#1a365d", "#2b6cb0", "#63b3ed", "#ffffff"],
        font_family: SANS_STACK,
        layout_style: "Balanced and symmetric, generous whitespace, data visualization",
        cover_style: "Centered headline with subtitle below on a gradient background",
        content_style: "Title bar on the left, content area on the right",
        thumbnail: "📊",
    },
    Template {
        id: "education",
        name: "Education & Training",
        description: "Bright colors with a lively teaching style",
        colors: &["#1a1a2e", "#f39c12", "#e74c3c", "#2ecc71", "#ffffff"],
        font_family: SANS_STACK,
        layout_style: "Mixed text and images, colored blocks, interactive feel",
        cover_style: "Playful headline paired with icons or illustrations",
        content_style: "Card layout with prominent key points",
        thumbnail: "📚",
    },
    Template {
        id: "creative",
        name: "Creative Design",
        description: "Bold colors and irregular composition",
        colors: &["#0f0f23", "#ff6b6b", "#ffd93d", "#6bcb77", "#4d96ff"],
        font_family: SANS_STACK,
        layout_style: "Irregular composition, large color fields, artistic",
        cover_style: "High-impact visuals with oversized type",
        content_style: "Free-form layout with creative graphic elements",
        thumbnail: "🎨",
    },
    Template {
        id: "minimal",
        name: "Minimalist",
        description: "Black, white and gray with understated elegance",
        colors: &["#ffffff", "#f5f5f5", "#333333", "#666666", "#000000"],
        font_family: SANS_STACK,
        layout_style: "Large whitespace, minimal composition",
        cover_style: "Text only, minimal design",
        content_style: "Single column, text first",
        thumbnail: "⬜",
    },
    Template {
        id: "tech",
        name: "Future Tech",
        description: "Dark background with neon accents",
        colors: &["#0a0e27", "#1a1a3e", "#00d4ff", "#7c3aed", "#10b981"],
        font_family: SANS_STACK,
        layout_style: "Grids and light effects, data visualization style",
        cover_style: "Dark background with glowing text",
        content_style: "Cards on a grid with gradient highlights",
        thumbnail: "🔮",
    },
];

#[must_use]
pub fn get_templates() -> &'static [Template] {
    &TEMPLATES
}

#[must_use]
pub fn get_template_by_id(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}

/// A design brief describing `template`, appended to rendering prompts.
#[must_use]
pub fn template_prompt_context(template: &Template) -> String {
    format!(
        "Slide template guidelines:
- Template: {}
- Description: {}
- Palette: {}
- Font: {}
- Layout style: {}
- Cover style: {}
- Content page style: {}

Follow these guidelines strictly so every page shares the same visual style.",
        template.name,
        template.description,
        template.colors.join(", "),
        template.font_family,
        template.layout_style,
        template.cover_style,
        template.content_style,
    )
}
