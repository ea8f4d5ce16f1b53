use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    pub has_selection: bool,
    pub on_import: Callback<()>,
    pub on_add_text: Callback<()>,
    pub on_add_image: Callback<()>,
    pub on_delete: Callback<()>,
    pub on_export: Callback<()>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let button = |label: &'static str, color: &'static str, callback: &Callback<()>, disabled: bool| {
        let onclick = callback.reform(|_: MouseEvent| ());
        html! {
            <button
                {onclick}
                {disabled}
                class={classes!(
                    "w-full",
                    "px-3",
                    "py-2",
                    "text-sm",
                    "text-white",
                    "rounded",
                    "transition-colors",
                    if disabled { "bg-gray-300 cursor-not-allowed" } else { color }
                )}
            >
                {label}
            </button>
        }
    };

    html! {
        <div class="space-y-4">
            <h2 class="text-lg font-semibold pb-3 border-b border-gray-200">{"Toolbar"}</h2>

            <div class="space-y-2">
                <h3 class="text-sm font-medium text-gray-700">{"Import"}</h3>
                {button("Import HTML", "bg-blue-500 hover:bg-blue-600", &props.on_import, false)}
            </div>

            <div class="space-y-2">
                <h3 class="text-sm font-medium text-gray-700">{"Add Elements"}</h3>
                {button("Add Text", "bg-green-500 hover:bg-green-600", &props.on_add_text, false)}
                {button("Add Image", "bg-green-500 hover:bg-green-600", &props.on_add_image, false)}
            </div>

            <div class="space-y-2">
                <h3 class="text-sm font-medium text-gray-700">{"Actions"}</h3>
                {button("Delete Selected", "bg-red-500 hover:bg-red-600", &props.on_delete, !props.has_selection)}
                {button("Export HTML", "bg-purple-500 hover:bg-purple-600", &props.on_export, false)}
            </div>
        </div>
    }
}
