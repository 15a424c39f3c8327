//! # modview
//!
//! Renders the output of an ES module lexer on top of the source it came from.
//!
//! The lexer reports imports and exports as flat lists of byte ranges. Those ranges nest
//! (a module specifier sits inside its import statement, a dynamic import marker sits at
//! the start of its call), and a viewer wants them as a tree it can draw and hover.
//!
//! File Layout
//!
//! src/modview
//!   ├── lexer        Raw lexer records and the ModuleLexer capability
//!   ├── version      Version parsing and capability gating
//!   ├── collector    Records -> tagged intervals
//!   ├── tree         Tagged intervals -> sorted interval tree
//!   ├── segment      Tree + source -> plain/annotated segments
//!   ├── pipeline     All of the above, end to end
//!   ├── formats      Presentation adapters (tag, treeviz, json)
//!   └── config       Layered settings over defaults/modview.default.toml
//!
//! For the test helpers, see the [testing module](modview::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod modview;
