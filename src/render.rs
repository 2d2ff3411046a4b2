//! Server-rendered HTML for the splash page, the form, and the result region.

use crate::animation::AnimationSet;
use crate::predictor::PredictionOutcome;
use crate::record::{
    Bounds, PropertyRecord, AREA_BOUNDS, CONDITION_BOUNDS, LOT_AREA_BOUNDS, SUBCLASS_BOUNDS,
    YEAR_BOUNDS,
};
use crate::variant::{Palette, VariantProfile};
use crate::vocabulary::CategoricalField;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;
use std::fmt::Write;

const LOTTIE_PLAYER: &str = "https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js";

/// Welcome page with the one-way entry button.
pub fn splash_page(profile: &VariantProfile, animations: &AnimationSet) -> String {
    let mut body = String::from(r#"<section class="splash">"#);
    body.push_str(&animation_slot("splash", animations.splash.as_ref(), 350));
    body.push_str(
        r#"<h1 class="hero">🏠 House Price Predictor</h1>
<p class="lead">Welcome to the Smart House Price Prediction App!</p>
<p class="muted">Get accurate house price predictions using advanced machine learning algorithms.</p>
<form method="post" action="/enter"><button type="submit" class="wide">Enter App →</button></form>
</section>"#,
    );
    page(profile, &body, animations.splash.is_some())
}

/// Main page: the form pre-filled with `record`, plus the outcome of the last submission.
pub fn main_page(
    profile: &VariantProfile,
    animations: &AnimationSet,
    record: &PropertyRecord,
    outcome: Option<&PredictionOutcome>,
) -> String {
    let mut body = String::from(r#"<section class="main"><header class="masthead"><div>"#);
    body.push_str(
        r#"<h1>Smart House Price Prediction App</h1>
<p class="subheader">Fill the details below to get an accurate prediction</p></div>"#,
    );
    body.push_str(&animation_slot("main", animations.main.as_ref(), 150));
    body.push_str("</header>");
    body.push_str(&form(profile, record));
    if let Some(outcome) = outcome {
        body.push_str(&result_region(outcome));
    }
    body.push_str("</section>");
    page(profile, &body, animations.main.is_some())
}

/// Markup for the result region of `outcome`.
pub fn result_region(outcome: &PredictionOutcome) -> String {
    let headline = encode_text(&outcome.headline()).into_owned();
    match outcome {
        PredictionOutcome::Estimate { .. } => {
            format!(r#"<div class="prediction-result" role="status">{headline}</div>"#)
        }
        PredictionOutcome::ModelUnavailable { .. } => {
            format!(r#"<div class="alert" role="alert">{headline}</div>"#)
        }
        PredictionOutcome::Failed { detail } => format!(
            r#"<div class="alert" role="alert">{headline}<pre class="detail">{}</pre></div>"#,
            encode_text(detail)
        ),
    }
}

fn form(profile: &VariantProfile, record: &PropertyRecord) -> String {
    let property_fields = [
        number_field(
            "🏷️ MS SubClass",
            "subclass_code",
            record.subclass_code as f64,
            SUBCLASS_BOUNDS,
            Step::Whole,
        ),
        select_field("🏙️ MS Zoning", "zoning", CategoricalField::Zoning, record, profile),
        number_field(
            "🏗️ Year Built",
            "year_built",
            record.year_built as f64,
            YEAR_BOUNDS,
            Step::Whole,
        ),
        number_field(
            "📏 Lot Area (sq.ft)",
            "lot_area",
            record.lot_area,
            LOT_AREA_BOUNDS,
            Step::Any,
        ),
        select_field("📐 Lot Config", "lot_config", CategoricalField::LotConfig, record, profile),
        number_field(
            "🔨 Year Remodeled",
            "year_remodeled",
            record.year_remodeled as f64,
            YEAR_BOUNDS,
            Step::Whole,
        ),
        select_field(
            "🏘️ Building Type",
            "building_type",
            CategoricalField::BuildingType,
            record,
            profile,
        ),
        slider_field(
            "🔧 Overall Condition",
            "overall_condition",
            record.overall_condition,
            CONDITION_BOUNDS,
        ),
        select_field(
            "🎨 Exterior Material",
            "exterior_material",
            CategoricalField::ExteriorMaterial,
            record,
            profile,
        ),
    ];
    let basement_fields = [
        number_field(
            "🏚️ Basement Finished SF2",
            "basement_finished_area_2",
            record.basement_finished_area_2,
            AREA_BOUNDS,
            Step::Any,
        ),
        number_field(
            "🏠 Total Basement SF",
            "total_basement_area",
            record.total_basement_area,
            AREA_BOUNDS,
            Step::Any,
        ),
    ];

    let columns = profile.form_columns.max(1);
    let mut out = String::from(r#"<form class="prediction-form" method="post" action="/predict">"#);
    let _ = write!(
        out,
        r#"<h3>Property Details</h3><div class="grid" style="grid-template-columns:repeat({columns},1fr)">{}</div>"#,
        property_fields.concat()
    );
    let _ = write!(
        out,
        r#"<h3>Basement Details</h3><div class="grid" style="grid-template-columns:repeat({},1fr)">{}</div>"#,
        columns.min(2),
        basement_fields.concat()
    );
    out.push_str(r#"<button type="submit">💡 Predict House Price</button></form>"#);
    out
}

/// Granularity of a numeric input.
#[derive(Clone, Copy)]
enum Step {
    /// Integral fields.
    Whole,
    /// Real-valued areas, any fraction allowed.
    Any,
}

impl Step {
    fn attr(self) -> &'static str {
        match self {
            Self::Whole => "1",
            Self::Any => "any",
        }
    }
}

fn number_field(label: &str, name: &str, value: f64, bounds: Bounds, step: Step) -> String {
    let max = bounds
        .max
        .map(|max| format!(r#" max="{max}""#))
        .unwrap_or_default();
    format!(
        r#"<label class="field"><span class="field-label">{label}</span><input type="number" name="{name}" min="{min}"{max} step="{step}" value="{value}" required></label>"#,
        label = encode_text(label),
        min = bounds.min,
        step = step.attr(),
    )
}

fn slider_field(label: &str, name: &str, value: i64, bounds: Bounds) -> String {
    let max = bounds.max.unwrap_or(bounds.min);
    format!(
        r#"<label class="field"><span class="field-label">{label}</span><input type="range" name="{name}" min="{min}" max="{max}" step="1" value="{value}" oninput="this.nextElementSibling.textContent=this.value"><output class="muted">{value}</output></label>"#,
        label = encode_text(label),
        min = bounds.min,
    )
}

fn select_field(
    label: &str,
    name: &str,
    field: CategoricalField,
    record: &PropertyRecord,
    profile: &VariantProfile,
) -> String {
    let current = field.value_of(record);
    let mut options = String::new();
    for category in profile.vocabulary.categories(field) {
        let selected = if category == current { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{value}"{selected}>{text}</option>"#,
            value = encode_double_quoted_attribute(category),
            text = encode_text(category),
        );
    }
    format!(
        r#"<label class="field"><span class="field-label">{label}</span><select name="{name}">{options}</select></label>"#,
        label = encode_text(label),
    )
}

fn animation_slot(key: &str, animation: Option<&Value>, height: u32) -> String {
    let Some(animation) = animation else {
        return String::new();
    };
    let Ok(json) = serde_json::to_string(animation) else {
        return String::new();
    };
    // keep the payload from closing its own script element
    let json = json.replace("</", "<\\/");
    format!(
        r#"<div class="animation" data-source="anim-{key}" style="height:{height}px"></div><script type="application/json" id="anim-{key}">{json}</script>"#
    )
}

fn page(profile: &VariantProfile, body: &str, with_player: bool) -> String {
    let player = if with_player {
        format!(
            r#"<script src="{LOTTIE_PLAYER}"></script><script>
document.querySelectorAll('.animation').forEach(function (el) {{
  var data = document.getElementById(el.dataset.source);
  if (window.lottie && data) {{
    lottie.loadAnimation({{ container: el, renderer: 'svg', loop: true, autoplay: true,
      animationData: JSON.parse(data.textContent) }});
  }}
}});
</script>"#
        )
    } else {
        String::new()
    };
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>House Price Predictor</title><style>{css}</style></head>
<body data-variant="{variant}">{body}{player}</body></html>"#,
        css = stylesheet(&profile.palette),
        variant = profile.variant,
    )
}

fn stylesheet(palette: &Palette) -> String {
    format!(
        "body{{margin:0;font-family:system-ui,sans-serif;background:{bg};color:{text}}}\
section{{max-width:1100px;margin:0 auto;padding:2rem 3rem}}\
.splash{{text-align:center;max-width:640px;padding-top:3rem}}\
.hero{{font-size:3rem}}.lead{{font-size:1.5rem;color:{muted}}}.muted,.subheader{{color:{muted}}}\
.masthead{{display:flex;justify-content:space-between;align-items:center}}\
.prediction-form{{background:{surface};padding:2rem;border-radius:12px;border:1px solid {muted}}}\
.grid{{display:grid;gap:1rem}}.field{{display:flex;flex-direction:column;gap:.3rem}}\
.field-label{{font-weight:500}}\
button{{background:{accent};color:#fff;font-weight:bold;padding:.75rem 1.5rem;font-size:1.1rem;border:none;border-radius:8px;margin-top:1.5rem;cursor:pointer}}\
button.wide{{width:100%}}\
.prediction-result{{font-size:1.4rem;font-weight:bold;padding:1.5rem;border-radius:8px;background:{result};text-align:center;margin:1rem 0;border:1px solid {accent}}}\
.alert{{padding:1rem;border-radius:8px;background:#7F1D1D;color:#FEE2E2;margin:1rem 0}}\
.detail{{white-space:pre-wrap;font-size:.9rem}}",
        bg = palette.background,
        text = palette.text,
        muted = palette.muted,
        surface = palette.surface,
        accent = palette.accent,
        result = palette.result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;
    use serde_json::json;

    #[test]
    fn splash_offers_entry_action() {
        let html = splash_page(&VariantProfile::default(), &AnimationSet::default());
        assert!(html.contains(r#"action="/enter""#));
        assert!(html.contains("Enter App →"));
        assert!(!html.contains("lottie"));
    }

    #[test]
    fn form_widgets_follow_vocabulary_and_bounds() {
        let profile = VariantProfile::new(Variant::Extended);
        let html = main_page(&profile, &AnimationSet::default(), &PropertyRecord::default(), None);
        assert!(html.contains(r#"name="subclass_code" min="20" max="190" step="1" value="60""#));
        assert!(html.contains(r#"name="year_built" min="1800" max="2025" step="1""#));
        assert!(html.contains(r#"name="lot_area" min="1000" step="any" value="8000""#));
        assert!(html.contains(r#"type="range" name="overall_condition" min="1" max="10""#));
        assert!(html.contains(r#"<option value="C (all)">C (all)</option>"#));
        assert!(html.contains(r#"<option value="VinylSd" selected>"#));
        assert!(html.contains(r#"<option value="BrkComm">"#));
        assert!(!html.contains(r#"<option value="AsphShn">"#));
        assert!(!html.contains(r#"class="prediction-result""#));
        assert!(html.contains(r#"class="prediction-form""#));
    }

    #[test]
    fn form_keeps_submitted_values() {
        let record = PropertyRecord {
            zoning: "FV".to_string(),
            basement_finished_area_2: 12.5,
            ..PropertyRecord::default()
        };
        let html = main_page(&VariantProfile::default(), &AnimationSet::default(), &record, None);
        assert!(html.contains(r#"<option value="FV" selected>"#));
        assert!(html.contains(
            r#"name="basement_finished_area_2" min="0" step="any" value="12.5" required"#
        ));
    }

    #[test]
    fn condition_slider_reports_its_value() {
        let record = PropertyRecord {
            overall_condition: 7,
            ..PropertyRecord::default()
        };
        let html = main_page(&VariantProfile::default(), &AnimationSet::default(), &record, None);
        assert!(html.contains(
            r#"value="7" oninput="this.nextElementSibling.textContent=this.value"><output class="muted">7</output>"#
        ));
    }

    #[test]
    fn failure_detail_is_escaped() {
        let outcome = PredictionOutcome::Failed {
            detail: "<script>alert(1)</script>".to_string(),
        };
        let html = result_region(&outcome);
        assert!(html.contains("Prediction failed"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn animation_payload_cannot_break_out() {
        let animations = AnimationSet {
            splash: Some(json!({ "nm": "</script><b>x" })),
            main: None,
        };
        let html = splash_page(&VariantProfile::default(), &animations);
        assert!(html.contains(r#"<\/script><b>x"#));
        assert!(html.contains(LOTTIE_PLAYER));
    }
}
