//! Method selector tabs.
//!
//! One tab per tracing engine. The selected tab is highlighted; both
//! methods keep their parameter values while unselected.

use dioxus::prelude::*;
use senga_core::TraceMethod;

/// Props for the [`MethodTabs`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MethodTabsProps {
    /// Currently selected method.
    selected: TraceMethod,
    /// Callback fired when a tab is clicked.
    on_select: EventHandler<TraceMethod>,
}

/// Tab strip for switching between tracing engines.
#[component]
pub fn MethodTabs(props: MethodTabsProps) -> Element {
    rsx! {
        div { class: "method-tabs",
            for method in TraceMethod::ALL {
                {render_tab(method, props.selected == method, &props.on_select)}
            }
        }
    }
}

/// Render a single method tab.
fn render_tab(
    method: TraceMethod,
    selected: bool,
    on_select: &EventHandler<TraceMethod>,
) -> Element {
    let on_select = *on_select;
    let tab_class = if selected {
        "method-tab method-tab-active"
    } else {
        "method-tab"
    };

    rsx! {
        button {
            class: "{tab_class}",
            onclick: move |_| on_select.call(method),
            span { class: "method-tab-label", "{method.label()}" }
            span { class: "method-tab-blurb", "{method.blurb()}" }
        }
    }
}
