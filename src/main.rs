// The dioxus prelude contains a ton of common items used in dioxus apps. It's a good idea to import wherever you
// need dioxus
use dioxus::prelude::*;

use components::thread::Route;

mod components;
mod views;

const MAIN_CSS: Asset = asset!("/assets/styling/main.css");

fn main() {
    #[cfg(all(not(target_arch = "wasm32"), feature = "desktop"))]
    {
        let window = dioxus::desktop::WindowBuilder::new().with_title("Threads");
        let cfg = dioxus::desktop::Config::new().with_window(window);
        dioxus::LaunchBuilder::desktop().with_cfg(cfg).launch(App);
    }

    #[cfg(any(target_arch = "wasm32", not(feature = "desktop")))]
    dioxus::launch(App);
}

/// Root component. The launcher installs the tracing subscriber before this runs.
#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Title { "Threads" }

        // The router renders the thread shell layout and the page matching the current URL.
        Router::<Route> {}
    }
}
