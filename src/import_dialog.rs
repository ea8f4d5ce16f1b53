use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::{HTML_MIME, PREVIEW_LIMIT};
use crate::sample::SAMPLE_POSTER;
use crate::utils::preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTab {
    Upload,
    Paste,
}

/// Whitespace-only content is never imported.
pub fn can_import(content: &str) -> bool {
    !content.trim().is_empty()
}

pub fn accepts_file_type(mime: &str) -> bool {
    mime == HTML_MIME
}

fn tab_class(active: bool) -> &'static str {
    if active {
        "border-blue-500 text-blue-600"
    } else {
        "border-transparent text-gray-500 hover:text-gray-700"
    }
}

#[derive(Properties, PartialEq)]
pub struct ImportDialogProps {
    pub on_import: Callback<String>,
    pub on_close: Callback<()>,
}

#[function_component(ImportDialog)]
pub fn import_dialog(props: &ImportDialogProps) -> Html {
    let content = use_state(String::new);
    let active_tab = use_state(|| ImportTab::Upload);
    // bumps on every chosen file; only the latest read may land
    let generation = use_mut_ref(|| 0u64);

    let on_file = {
        let content = content.clone();
        let generation = generation.clone();
        Callback::from(move |e: Event| {
            let Some(file) = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0))
            else {
                return;
            };
            if !accepts_file_type(&file.type_()) {
                log::warn!("ignoring {}: not {HTML_MIME}", file.name());
                return;
            }

            let ticket = {
                let mut current = generation.borrow_mut();
                *current += 1;
                *current
            };
            let content = content.clone();
            let generation = generation.clone();
            spawn_local(async move {
                match JsFuture::from(file.text()).await {
                    Ok(text) if *generation.borrow() == ticket => {
                        if let Some(text) = text.as_string() {
                            content.set(text);
                        }
                    }
                    Ok(_) => log::debug!("discarding superseded read of {}", file.name()),
                    Err(err) => log::warn!("could not read {}: {err:?}", file.name()),
                }
            });
        })
    };

    let on_paste = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                content.set(textarea.value());
            }
        })
    };

    let load_sample = {
        let content = content.clone();
        let active_tab = active_tab.clone();
        Callback::from(move |_: MouseEvent| {
            content.set(SAMPLE_POSTER.to_string());
            active_tab.set(ImportTab::Paste);
        })
    };

    let on_submit = {
        let content = content.clone();
        let on_import = props.on_import.clone();
        Callback::from(move |_: MouseEvent| {
            if can_import(&content) {
                on_import.emit((*content).clone());
            }
        })
    };

    let on_close = props.on_close.reform(|_: MouseEvent| ());

    let tab_button = |tab: ImportTab, label: &'static str| {
        let setter = active_tab.clone();
        let onclick = Callback::from(move |_: MouseEvent| setter.set(tab));
        html! {
            <button
                {onclick}
                class={classes!(
                    "px-4",
                    "py-2",
                    "border-b-2",
                    "font-medium",
                    "text-sm",
                    tab_class(*active_tab == tab)
                )}
            >
                {label}
            </button>
        }
    };

    let sample_button = html! {
        <button
            onclick={load_sample}
            class="px-4 py-2 bg-gray-100 text-gray-700 rounded hover:bg-gray-200 transition-colors"
        >
            {"Load Sample HTML"}
        </button>
    };

    html! {
        <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
            <div class="bg-white rounded-lg shadow-xl w-full max-w-4xl max-h-[80vh] overflow-hidden">
                <div class="flex items-center justify-between p-6 border-b">
                    <h2 class="text-xl font-semibold">{"Import HTML"}</h2>
                    <button onclick={on_close.clone()} class="text-gray-400 hover:text-gray-600 text-2xl">
                        {"×"}
                    </button>
                </div>

                <div class="p-6">
                    <div class="flex border-b mb-4">
                        {tab_button(ImportTab::Upload, "Upload File")}
                        {tab_button(ImportTab::Paste, "Paste HTML")}
                    </div>

                    if *active_tab == ImportTab::Upload {
                        <div class="space-y-4">
                            <div>
                                <label class="block text-sm font-medium text-gray-700 mb-2">
                                    {"Choose HTML file"}
                                </label>
                                <input
                                    type="file"
                                    accept=".html,.htm"
                                    onchange={on_file}
                                    class="w-full text-sm text-gray-500"
                                />
                            </div>
                            <div class="text-center">
                                <p class="text-gray-500 mb-2">{"or"}</p>
                                {sample_button.clone()}
                            </div>
                        </div>
                    } else {
                        <div class="space-y-4">
                            <div>
                                <label class="block text-sm font-medium text-gray-700 mb-2">
                                    {"Paste HTML content"}
                                </label>
                                <textarea
                                    value={(*content).clone()}
                                    oninput={on_paste}
                                    placeholder="Paste your HTML content here..."
                                    class="w-full h-64 px-3 py-2 border border-gray-300 rounded text-sm font-mono"
                                />
                            </div>
                            {sample_button}
                        </div>
                    }

                    if !content.is_empty() {
                        <div class="mt-6 border-t pt-4">
                            <h3 class="text-sm font-medium text-gray-700 mb-2">{"Preview"}</h3>
                            <div class="bg-gray-50 p-4 rounded max-h-32 overflow-auto">
                                <pre class="text-xs text-gray-600 whitespace-pre-wrap">
                                    {preview(&content, PREVIEW_LIMIT)}
                                </pre>
                            </div>
                        </div>
                    }
                </div>

                <div class="flex justify-end space-x-3 p-6 border-t bg-gray-50">
                    <button
                        onclick={on_close}
                        class="px-4 py-2 text-gray-700 bg-white border border-gray-300 rounded hover:bg-gray-50 transition-colors"
                    >
                        {"Cancel"}
                    </button>
                    <button
                        onclick={on_submit}
                        disabled={!can_import(&content)}
                        class="px-4 py-2 bg-blue-500 text-white rounded hover:bg-blue-600 transition-colors disabled:bg-gray-300 disabled:cursor-not-allowed"
                    >
                        {"Import"}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_content_cannot_be_imported() {
        assert!(!can_import(""));
        assert!(!can_import("  \n\t "));
        assert!(can_import("<p>hi</p>"));
    }

    #[test]
    fn test_only_the_active_tab_is_highlighted() {
        let active = ImportTab::Paste;
        assert!(tab_class(active == ImportTab::Paste).contains("border-blue-500"));
        assert!(tab_class(active == ImportTab::Upload).contains("border-transparent"));
    }

    #[test]
    fn test_only_html_files_are_read() {
        assert!(accepts_file_type("text/html"));
        assert!(!accepts_file_type("text/plain"));
        assert!(!accepts_file_type(""));
    }
}
