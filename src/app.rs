use yew::prelude::*;

use crate::components::StageCanvas;
use crate::import_dialog::ImportDialog;
use crate::properties_panel::PropertiesPanel;
use crate::stage::StageHandle;
use crate::toolbar::Toolbar;
use crate::types::{ElementData, ElementKind};

#[function_component(App)]
pub fn app() -> Html {
    let selected = use_state(|| None::<ElementData>);
    let show_import = use_state(|| false);

    // one controller for the life of the page
    let stage = {
        let selected = selected.clone();
        use_memo((), move |_| {
            StageHandle::new(Callback::from(move |data: Option<ElementData>| selected.set(data)))
        })
    };
    let stage: StageHandle = (*stage).clone();

    let on_import = {
        let stage = stage.clone();
        let show_import = show_import.clone();
        Callback::from(move |content: String| {
            stage.import(&content);
            show_import.set(false);
        })
    };

    let open_import = {
        let show_import = show_import.clone();
        Callback::from(move |_: ()| show_import.set(true))
    };
    let close_import = {
        let show_import = show_import.clone();
        Callback::from(move |_: ()| show_import.set(false))
    };

    let add = |kind: ElementKind| {
        let stage = stage.clone();
        Callback::from(move |_: ()| stage.add_element(kind))
    };

    let on_delete = {
        let stage = stage.clone();
        Callback::from(move |_: ()| stage.delete_selected())
    };

    let on_export = {
        let stage = stage.clone();
        Callback::from(move |_: ()| stage.export())
    };

    let on_apply = {
        let stage = stage.clone();
        Callback::from(move |data: ElementData| stage.update(data))
    };

    html! {
        <div class="flex h-screen bg-gray-100">
            <div class="w-64 flex-none bg-white border-r border-gray-200 p-4">
                <Toolbar
                    has_selection={selected.is_some()}
                    on_import={open_import}
                    on_add_text={add(ElementKind::Text)}
                    on_add_image={add(ElementKind::Image)}
                    {on_delete}
                    {on_export}
                />
            </div>

            <div class="flex-1 flex">
                <div class="flex-1 flex items-center justify-center p-8 overflow-auto">
                    <StageCanvas handle={stage.clone()} selected={(*selected).clone()} />
                </div>

                <div class="w-80 flex-none bg-white border-l border-gray-200 p-4 overflow-y-auto">
                    <PropertiesPanel selected={(*selected).clone()} {on_apply} />
                </div>
            </div>

            if *show_import {
                <ImportDialog {on_import} on_close={close_import} />
            }
        </div>
    }
}
