use std::rc::Rc;

use gloo::file::callbacks::{read_as_data_url, FileReader};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::{DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR, FONT_WEIGHTS};
use crate::types::{is_image_tag, is_text_tag, ElementData, ElementId, ElementStyle, StyleProperty};
use crate::utils::{color_to_hex, parse_px, px};

/// A field the panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Content,
    Src,
    Alt,
    Style(StyleProperty),
}

/// Uncommitted panel edits for one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelDraft {
    element: Option<ElementId>,
    content: Option<String>,
    src: Option<String>,
    alt: Option<String>,
    style: ElementStyle,
}

pub enum DraftAction {
    /// A new snapshot arrived; start over for `element`.
    Bind(Option<ElementId>),
    /// An edit aimed at `element`. Dropped if the draft moved on.
    Edit {
        element: ElementId,
        field: DraftField,
        value: String,
    },
}

impl Reducible for PanelDraft {
    type Action = DraftAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            DraftAction::Bind(element) => Rc::new(PanelDraft {
                element,
                ..PanelDraft::default()
            }),
            DraftAction::Edit {
                element,
                field,
                value,
            } => {
                if self.element.as_ref() != Some(&element) {
                    log::debug!("dropping edit for {element}: panel moved on");
                    return self;
                }
                let mut next = (*self).clone();
                match field {
                    DraftField::Content => next.content = Some(value),
                    DraftField::Src => next.src = Some(value),
                    DraftField::Alt => next.alt = Some(value),
                    DraftField::Style(property) => next.style.set(property, value),
                }
                Rc::new(next)
            }
        }
    }
}

impl PanelDraft {
    pub fn is_bound_to(&self, id: &ElementId) -> bool {
        self.element.as_ref() == Some(id)
    }

    /// The value to show for `field`: the draft's if any, else the committed one.
    pub fn value(&self, committed: &ElementData, field: DraftField) -> Option<String> {
        let draft = self.is_bound_to(&committed.id);
        match field {
            DraftField::Content => draft
                .then(|| self.content.clone())
                .flatten()
                .or_else(|| committed.content.clone()),
            DraftField::Src => draft
                .then(|| self.src.clone())
                .flatten()
                .or_else(|| committed.src.clone()),
            DraftField::Alt => draft
                .then(|| self.alt.clone())
                .flatten()
                .or_else(|| committed.alt.clone()),
            DraftField::Style(property) => draft
                .then(|| self.style.get(property).map(str::to_string))
                .flatten()
                .or_else(|| committed.style.get(property).map(str::to_string)),
        }
    }

    /// Overlay the draft on `committed`, keeping `position` in step with the
    /// merged `left`/`top`.
    pub fn merge_over(&self, committed: &ElementData) -> ElementData {
        let mut merged = committed.clone();
        if !self.is_bound_to(&committed.id) {
            return merged;
        }
        if let Some(content) = &self.content {
            merged.content = Some(content.clone());
        }
        if let Some(src) = &self.src {
            merged.src = Some(src.clone());
        }
        if let Some(alt) = &self.alt {
            merged.alt = Some(alt.clone());
        }
        merged.style.merge(&self.style);
        merged.sync_position();
        merged
    }
}

/// Which field groups apply to a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet {
    pub text: bool,
    pub image: bool,
}

impl FieldSet {
    pub fn for_tag(tag_name: &str) -> Self {
        Self {
            text: is_text_tag(tag_name),
            image: is_image_tag(tag_name),
        }
    }
}

fn input_value(callback: Callback<String>) -> Callback<InputEvent> {
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            callback.emit(input.value());
        } else if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
            callback.emit(area.value());
        }
    })
}

/// Left/top fields take whole pixels; anything else leaves the draft alone.
fn axis_input(text: &str) -> Option<String> {
    text.trim().parse::<i32>().ok().map(px)
}

#[derive(Properties, PartialEq)]
pub struct PropertiesPanelProps {
    pub selected: Option<ElementData>,
    pub on_apply: Callback<ElementData>,
}

#[function_component(PropertiesPanel)]
pub fn properties_panel(props: &PropertiesPanelProps) -> Html {
    let draft = use_reducer(PanelDraft::default);
    let upload = use_mut_ref(|| None::<FileReader>);

    // every published snapshot discards pending edits
    {
        let dispatcher = draft.dispatcher();
        let upload = upload.clone();
        use_effect_with(props.selected.clone(), move |selected| {
            upload.borrow_mut().take();
            dispatcher.dispatch(DraftAction::Bind(selected.as_ref().map(|data| data.id.clone())));
        });
    }

    let Some(selected) = props.selected.as_ref() else {
        return html! {
            <div class="space-y-4">
                <h2 class="text-lg font-semibold pb-3 border-b border-gray-200">{"Properties"}</h2>
                <p class="text-sm text-gray-500">{"Select an element to edit its properties"}</p>
            </div>
        };
    };

    let fields = FieldSet::for_tag(&selected.tag_name);
    let value = |field: DraftField| draft.value(selected, field).unwrap_or_default();
    let on_field = |field: DraftField| {
        let dispatcher = draft.dispatcher();
        let element = selected.id.clone();
        Callback::from(move |value: String| {
            dispatcher.dispatch(DraftAction::Edit {
                element: element.clone(),
                field,
                value,
            })
        })
    };

    let on_image_file = {
        let dispatcher = draft.dispatcher();
        let element = selected.id.clone();
        let upload = upload.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let dispatcher = dispatcher.clone();
            let element = element.clone();
            let reader = read_as_data_url(&gloo::file::File::from(file), move |result| match result {
                Ok(data_url) => dispatcher.dispatch(DraftAction::Edit {
                    element,
                    field: DraftField::Src,
                    value: data_url,
                }),
                Err(err) => log::warn!("image upload failed: {err}"),
            });
            *upload.borrow_mut() = Some(reader);
        })
    };

    let on_axis = |property: StyleProperty| {
        let callback = on_field(DraftField::Style(property));
        Callback::from(move |e: InputEvent| {
            if let Some(value) = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| axis_input(&input.value()))
            {
                callback.emit(value);
            }
        })
    };

    let on_weight = {
        let callback = on_field(DraftField::Style(StyleProperty::FontWeight));
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                callback.emit(select.value());
            }
        })
    };

    let on_submit = {
        let on_apply = props.on_apply.clone();
        let merged = draft.merge_over(selected);
        Callback::from(move |_: MouseEvent| on_apply.emit(merged.clone()))
    };

    let axis_value = |property: StyleProperty| {
        parse_px(&value(DraftField::Style(property))).unwrap_or(0).to_string()
    };
    let size_value = |property: StyleProperty| {
        Some(value(DraftField::Style(property)))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "auto".to_string())
    };
    let font_size = Some(value(DraftField::Style(StyleProperty::FontSize)))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| DEFAULT_FONT_SIZE.to_string());
    let color = color_to_hex(&value(DraftField::Style(StyleProperty::Color)))
        .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string());
    let weight = Some(value(DraftField::Style(StyleProperty::FontWeight)))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "normal".to_string());

    html! {
        <div class="space-y-4">
            <h2 class="text-lg font-semibold pb-3 border-b border-gray-200">{"Properties"}</h2>

            <div class="space-y-3">
                <div>
                    <label class="block text-sm font-medium text-gray-700">{"Element Type"}</label>
                    <p class="text-sm text-gray-600 bg-gray-100 px-2 py-1 rounded">
                        {selected.tag_name.to_uppercase()}
                    </p>
                </div>

                if fields.text {
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Text Content"}</label>
                        <textarea
                            value={value(DraftField::Content)}
                            oninput={input_value(on_field(DraftField::Content))}
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                            rows="3"
                        />
                        <p class="text-xs text-gray-500 mt-1">
                            {"Tip: Double-click the element on the stage to edit inline"}
                        </p>
                    </div>
                }

                if fields.image {
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Image Source"}</label>
                        <input
                            type="text"
                            value={value(DraftField::Src)}
                            oninput={input_value(on_field(DraftField::Src))}
                            placeholder="Enter image URL"
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm mb-2"
                        />
                        <input
                            type="file"
                            accept="image/*"
                            onchange={on_image_file}
                            class="w-full text-sm text-gray-500"
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Alt Text"}</label>
                        <input
                            type="text"
                            value={value(DraftField::Alt)}
                            oninput={input_value(on_field(DraftField::Alt))}
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        />
                    </div>
                }

                <div class="grid grid-cols-2 gap-2">
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Left (px)"}</label>
                        <input
                            type="number"
                            value={axis_value(StyleProperty::Left)}
                            oninput={on_axis(StyleProperty::Left)}
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Top (px)"}</label>
                        <input
                            type="number"
                            value={axis_value(StyleProperty::Top)}
                            oninput={on_axis(StyleProperty::Top)}
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        />
                    </div>
                </div>

                <div class="grid grid-cols-2 gap-2">
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Width"}</label>
                        <input
                            type="text"
                            value={size_value(StyleProperty::Width)}
                            oninput={input_value(on_field(DraftField::Style(StyleProperty::Width)))}
                            placeholder="auto, 100px, 50%"
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Height"}</label>
                        <input
                            type="text"
                            value={size_value(StyleProperty::Height)}
                            oninput={input_value(on_field(DraftField::Style(StyleProperty::Height)))}
                            placeholder="auto, 100px, 50%"
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        />
                    </div>
                </div>

                if fields.text {
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Font Size"}</label>
                        <input
                            type="text"
                            value={font_size}
                            oninput={input_value(on_field(DraftField::Style(StyleProperty::FontSize)))}
                            placeholder="16px, 1.2em, large"
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Color"}</label>
                        <input
                            type="color"
                            value={color}
                            oninput={input_value(on_field(DraftField::Style(StyleProperty::Color)))}
                            class="w-full h-10 border border-gray-300 rounded"
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">{"Font Weight"}</label>
                        <select
                            onchange={on_weight}
                            class="w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        >
                            {
                                FONT_WEIGHTS.iter().map(|option| {
                                    html! {
                                        <option
                                            key={*option}
                                            value={*option}
                                            selected={*option == weight}
                                        >
                                            {weight_label(option)}
                                        </option>
                                    }
                                }).collect::<Html>()
                            }
                        </select>
                    </div>
                }

                <button
                    onclick={on_submit}
                    class="w-full px-4 py-2 bg-blue-500 text-white rounded hover:bg-blue-600 transition-colors"
                >
                    {"Apply Changes"}
                </button>
            </div>
        </div>
    }
}

fn weight_label(weight: &str) -> String {
    let mut chars = weight.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
