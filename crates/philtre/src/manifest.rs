//! Manifest include and script-insertion nodes.
//!
//! Two fixed PHP fragments get attached to every processed template:
//! an include directive pulling in the generated asset manifest, and a
//! helper function templates call to emit `<script>` tags for a bundle
//! entry. Both are attached after minification so the splice-back step
//! never sees them.

use philtre_minify::{Node, NodeSequence};

use crate::config::{InsertionPlacement, ResolvedConfig};

/// The include directive referencing the asset manifest. Always the first
/// node of a processed file.
pub fn include_node(manifest_file: &str) -> Node {
    Node::Embedded(format!("<?php require_once \"{manifest_file}\" ?>"))
}

/// The insertion helper: emits a `<script>` tag for every JS asset the
/// manifest records for `$entry`.
pub fn insertion_node() -> Node {
    Node::Embedded(
        r#"<?php
function insertion($variant, $entry) {
    global $assetsMap;
    $js = $assetsMap['js'];
    if (isset($js[$entry])) {
        foreach ($js[$entry] as $v) {
            echo '<script type="text/javascript">';
            require_once($v);
            echo '</script>';
        }
    }
}
?>"#
        .to_string(),
    )
}

/// Whether `file_name` gets the insertion helper: listed in the allow-list,
/// or unconditionally when no allow-list is configured.
pub fn wants_insertion(config: &ResolvedConfig, file_name: &str) -> bool {
    match &config.insertion {
        Some(allow) => allow.iter().any(|name| name == file_name),
        None => true,
    }
}

/// Attach the manifest include (and, per policy, the insertion helper) to a
/// rendered sequence.
pub fn attach(sequence: &mut NodeSequence, config: &ResolvedConfig, file_name: &str) {
    sequence.prepend(include_node(&config.manifest_file));
    if wants_insertion(config, file_name) {
        match config.insertion_placement {
            InsertionPlacement::Append => sequence.append(insertion_node()),
            // Index 1: right after the include directive.
            InsertionPlacement::Prepend => sequence.insert(1, insertion_node()),
        }
    }
}
