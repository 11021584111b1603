use crate::{templates::template_prompt_context, DetailLevel, Page, SlideRatio, Template};

/// Palette used for HTML slides when no template is selected.
pub const DEFAULT_COLORS: [&str; 4] = ["#1a1a2e", "#16213e", "#0f3460", "#e94560"];
/// Font stack used for HTML slides when no template is selected.
pub const DEFAULT_FONT_FAMILY: &str = "'Noto Sans SC', 'Microsoft YaHei', sans-serif";
const DEFAULT_DESIGN_STYLE: &str = "Modern business style, clean and professional";

pub fn split_system_prompt(
    page_count: usize,
    template: Option<&Template>,
    detail_level: DetailLevel,
) -> String {
    let content_requirement = match detail_level {
        DetailLevel::Brief => {
            "content: brief text shown on the page; keep it concise, distill the core ideas and avoid long passages"
        }
        DetailLevel::Detailed => {
            "content: detailed text shown on the page; be as thorough as possible with in-depth explanations and supporting arguments"
        }
        DetailLevel::Balanced => {
            "content: the core text shown on the page; make it substantial rather than overly short"
        }
    };

    let mut prompt = format!(
        "You are a professional presentation content planner. Split the material provided by the user into exactly {page_count} slides.
Each slide is a JSON object with these fields:
1. title: the slide title (short and punchy)
2. keyPoints: an array of 3-5 key points
3. {content_requirement}
4. emphasis: the single most important sentence or keyword of the slide
5. layoutSuggestion: a layout suggestion such as \"image left, text right\", \"full-bleed background with text overlay\" or \"data chart\""
    );

    if let Some(template) = template {
        prompt.push_str(&format!(
            "\n\nTemplate style reference: {}, palette: {}, layout style: {}",
            template.name,
            template.colors.join(", "),
            template.layout_style
        ));
    }

    prompt.push_str(&format!(
        "\n\nMake sure that:
- Slide 1 is the cover page with a main title and a subtitle
- Slide {page_count} (the last slide) is the summary page
- Content is distributed evenly and flows logically
- All text is written in the same language as the source material

Respond with the JSON array only, without any other text."
    ));

    prompt
}

pub fn split_user_prompt(page_count: usize, text: &str) -> String {
    format!("Here is the material to split into {page_count} slides:\n\n{text}")
}

fn position_hints(page_index: usize, total_pages: usize) -> (bool, bool) {
    (page_index == 0, page_index + 1 == total_pages)
}

/// Natural-language prompt for an image model rendering one slide.
pub fn image_prompt(
    page: &Page,
    page_index: usize,
    total_pages: usize,
    template: Option<&Template>,
    design_style: Option<&str>,
    detail_level: DetailLevel,
    ratio: &str,
) -> String {
    let (is_cover, is_closing) = position_hints(page_index, total_pages);
    let style = design_style
        .filter(|style| !style.trim().is_empty())
        .unwrap_or(DEFAULT_DESIGN_STYLE);

    let mut prompt = format!(
        "Generate an image of a presentation slide. This is slide {} of {total_pages}.\n\nTitle: {}\n",
        page_index + 1,
        page.title
    );

    if !page.key_points.is_empty() {
        prompt.push_str("\nKey points:");
        for (index, point) in page.key_points.iter().enumerate() {
            prompt.push_str(&format!("\n{}. {point}", index + 1));
        }
    }
    if !page.content.is_empty() {
        prompt.push_str(&format!("\n\nContent: {}", page.content));
    }
    if !page.emphasis.is_empty() {
        prompt.push_str(&format!("\n\nEmphasis: {}", page.emphasis));
    }

    prompt.push_str(&format!("\n\nDesign requirements:\n- Style: {style}"));
    if let Some(template) = template {
        prompt.push_str(&format!(
            "\n- Design theme: {}, main colors: {}",
            template.name,
            template.colors.join("/")
        ));
    }
    prompt.push_str(&format!(
        "\n- Layout suggestion: {}
- Render all text in the language of the content above
- Slide aspect ratio {ratio}
- Professional slide design combining text and visuals",
        layout_or_auto(page)
    ));

    match detail_level {
        DetailLevel::Brief => {
            prompt.push_str("\n- Keep the points short\n- Avoid long paragraphs, prefer keywords");
        }
        DetailLevel::Detailed => {
            prompt.push_str("\n- Expand on each point\n- Keep the information complete and rigorous");
        }
        DetailLevel::Balanced => {}
    }
    if is_cover {
        prompt.push_str("\n- This is the cover page and needs a large, eye-catching headline");
    }
    if is_closing {
        prompt.push_str("\n- This is the closing summary / thank-you page");
    }

    prompt
}

/// System prompt asking a text model for a self-contained HTML slide.
pub fn html_system_prompt(
    page_index: usize,
    total_pages: usize,
    template: Option<&Template>,
    design_style: Option<&str>,
    detail_level: DetailLevel,
    ratio: SlideRatio,
) -> String {
    let (width, height) = ratio.dimensions();
    let (is_cover, is_closing) = position_hints(page_index, total_pages);
    let colors = template.map_or_else(|| DEFAULT_COLORS.join(", "), |t| t.colors.join(", "));
    let font_family = template.map_or(DEFAULT_FONT_FAMILY, |t| t.font_family);
    let detail_instructions = match detail_level {
        DetailLevel::Brief => "Keep the text lean, use bullet points and avoid long paragraphs",
        DetailLevel::Detailed => {
            "Make the text rich and fully developed so the slide carries plenty of information"
        }
        DetailLevel::Balanced => "Present the content clearly",
    };

    let mut prompt = format!(
        "You are a professional presentation designer. Produce one complete HTML page that looks like a presentation slide.
Requirements:
1. The page is exactly {width}x{height} pixels (aspect ratio {})
2. Use inline CSS styles only
3. The design is modern, professional and attractive
4. Main colors: {colors}
5. Font: {font_family}
6. Use suitable gradient backgrounds and shadows
7. Write all text in the same language as the slide content
8. Do not use external resources (replace images with CSS gradients or inline SVG)
9. Return only the complete HTML code without any other text
10. {detail_instructions}

This is slide {} of {total_pages}.",
        ratio.as_str(),
        page_index + 1,
    );

    if is_cover {
        prompt.push_str("\nThis is the cover page.");
    }
    if is_closing {
        prompt.push_str("\nThis is the closing summary / thank-you page.");
    }
    if let Some(style) = design_style.filter(|style| !style.trim().is_empty()) {
        prompt.push_str(&format!("\nDesign style: {style}"));
    }
    if let Some(template) = template {
        prompt.push_str(&format!("\n\n{}", template_prompt_context(template)));
    }

    prompt
}

pub fn html_user_prompt(page: &Page) -> String {
    let mut prompt = format!("Title: {}", page.title);
    if !page.key_points.is_empty() {
        prompt.push_str("\nKey points:\n");
        prompt.push_str(&page.key_points.join("\n"));
    }
    if !page.content.is_empty() {
        prompt.push_str(&format!("\nContent: {}", page.content));
    }
    if !page.emphasis.is_empty() {
        prompt.push_str(&format!("\nEmphasis: {}", page.emphasis));
    }
    prompt.push_str(&format!("\nLayout suggestion: {}", layout_or_auto(page)));
    prompt
}

fn layout_or_auto(page: &Page) -> &str {
    if page.layout_suggestion.is_empty() {
        "automatic"
    } else {
        &page.layout_suggestion
    }
}
