//! Parameter controls for the selected tracing method.
//!
//! Renders sliders, selects, and toggles straight from the core
//! parameter schema, so a new backend parameter only needs a schema
//! entry. Only the selected method's controls are shown; the other
//! method's values persist untouched in the session.

use dioxus::prelude::*;
use senga_core::{schema, ParamDomain, ParamValue, ParameterSet, TraceMethod};

/// Props for the [`MethodControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MethodControlsProps {
    /// Method whose controls to show.
    method: TraceMethod,
    /// Current parameter values (read-only).
    params: ParameterSet,
    /// Callback fired with `(method, name, value)` on any edit.
    on_edit: EventHandler<(TraceMethod, String, ParamValue)>,
    /// Whether to display description text below each control.
    #[props(default = true)]
    show_descriptions: bool,
}

/// Renders every parameter control for one method, driven by the
/// schema table.
#[component]
pub fn MethodControls(props: MethodControlsProps) -> Element {
    let method = props.method;
    let on_edit = props.on_edit;

    // When descriptions are hidden, pass an empty string so the helpers
    // skip rendering the <p> element entirely.
    let desc = |text: &'static str| -> &'static str {
        if props.show_descriptions { text } else { "" }
    };

    rsx! {
        div { class: "controls",
            for spec in schema(method) {
                {match spec.domain {
                    ParamDomain::Toggle { default } => {
                        let checked = match props.params.get(method, spec.name) {
                            Some(&ParamValue::Bool(b)) => b,
                            _ => default,
                        };
                        let name = spec.name;
                        render_toggle(
                            spec.name,
                            spec.label,
                            desc(spec.description),
                            checked,
                            move |v: bool| {
                                on_edit.call((method, name.to_owned(), ParamValue::Bool(v)));
                            },
                        )
                    }
                    ParamDomain::IntRange { min, max, default } => {
                        let value = match props.params.get(method, spec.name) {
                            Some(&ParamValue::Int(n)) => n,
                            _ => default,
                        };
                        let name = spec.name;
                        #[allow(clippy::cast_precision_loss)]
                        let (value, min, max) = (value as f64, min as f64, max as f64);
                        render_slider(
                            spec.name,
                            spec.label,
                            desc(spec.description),
                            value,
                            min,
                            max,
                            1.0,
                            0,
                            move |v: f64| {
                                #[allow(clippy::cast_possible_truncation)]
                                let n = v.round() as i64;
                                on_edit.call((method, name.to_owned(), ParamValue::Int(n)));
                            },
                        )
                    }
                    ParamDomain::FloatRange { min, max, step, default } => {
                        let value = match props.params.get(method, spec.name) {
                            Some(&ParamValue::Float(x)) => x,
                            _ => default,
                        };
                        let name = spec.name;
                        // Decimal places follow the step size so the
                        // readout matches the slider resolution.
                        let decimals = if step < 0.1 { 2 } else { 1 };
                        render_slider(
                            spec.name,
                            spec.label,
                            desc(spec.description),
                            value,
                            min,
                            max,
                            step,
                            decimals,
                            move |v: f64| {
                                on_edit.call((method, name.to_owned(), ParamValue::Float(v)));
                            },
                        )
                    }
                    ParamDomain::Choice { options, default } => {
                        let selected = props
                            .params
                            .get(method, spec.name)
                            .and_then(|v| match v {
                                ParamValue::Choice(s) => Some(s.clone()),
                                _ => None,
                            })
                            .unwrap_or_else(|| default.to_owned());
                        let name = spec.name;
                        render_select(
                            spec.name,
                            spec.label,
                            desc(spec.description),
                            options,
                            &selected,
                            move |v: String| {
                                on_edit.call((method, name.to_owned(), ParamValue::Choice(v)));
                            },
                        )
                    }
                }}
            }
        }
    }
}

/// Render a labeled range slider with an optional description.
#[allow(clippy::too_many_arguments)]
fn render_slider(
    id: &str,
    label: &str,
    description: &str,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    decimals: usize,
    on_input: impl Fn(f64) + 'static,
) -> Element {
    let display = format!("{value:.decimals$}");
    let id = id.to_string();
    let label = label.to_string();
    let description = description.to_string();

    rsx! {
        div { class: "control-row",
            div { class: "control-head",
                label { r#for: "{id}", class: "control-label", "{label}" }
                span { class: "control-value", "{display}" }
            }
            if !description.is_empty() {
                p { class: "control-desc", "{description}" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                class: "control-slider",
                oninput: move |e| {
                    match e.value().parse::<f64>() {
                        Ok(v) => on_input(v),
                        Err(err) => {
                            web_sys::console::warn_1(
                                &format!("slider parse failure: {err:?} from {:?}", e.value())
                                    .into(),
                            );
                        }
                    }
                },
            }
        }
    }
}

/// Render a labeled toggle (checkbox) with an optional description.
fn render_toggle(
    id: &str,
    label: &str,
    description: &str,
    checked: bool,
    on_change: impl Fn(bool) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let description = description.to_string();

    rsx! {
        div { class: "control-row",
            div { class: "control-head",
                label { r#for: "{id}", class: "control-label", "{label}" }
                input {
                    r#type: "checkbox",
                    id: "{id}",
                    checked: checked,
                    class: "control-toggle",
                    onchange: move |e| {
                        on_change(e.checked());
                    },
                }
            }
            if !description.is_empty() {
                p { class: "control-desc", "{description}" }
            }
        }
    }
}

/// Render a labeled select dropdown with an optional description.
fn render_select(
    id: &str,
    label: &str,
    description: &str,
    options: &[&str],
    selected: &str,
    on_change: impl Fn(String) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let description = description.to_string();
    let options: Vec<String> = options.iter().map(|o| (*o).to_string()).collect();
    let selected = selected.to_string();

    rsx! {
        div { class: "control-row",
            label { r#for: "{id}", class: "control-label", "{label}" }
            if !description.is_empty() {
                p { class: "control-desc", "{description}" }
            }
            select {
                id: "{id}",
                class: "control-select",
                value: "{selected}",
                onchange: move |e| {
                    on_change(e.value());
                },

                for option in options.iter() {
                    option {
                        value: "{option}",
                        selected: option == &selected,
                        "{option}"
                    }
                }
            }
        }
    }
}
