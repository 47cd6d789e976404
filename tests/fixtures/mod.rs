//! Shared sources and helpers for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Two-key JSON layout.
pub const JSON_LAYOUT: &str =
    r#"{"layouts":{"layout_US":{"layout":[{"x":0,"y":0},{"x":1,"y":0}]}}}"#;

/// One-layer ZMK keymap matching [`JSON_LAYOUT`].
pub const ZMK_KEYMAP: &str = r#"
#include <behaviors.dtsi>
#include <dt-bindings/zmk/keys.h>

/ {
    keymap {
        compatible = "zmk,keymap";

        default_layer {
            label = "Default";
            bindings = <
                &kp A &kp B
            >;
        };
    };
};
"#;

/// Split-keyboard devicetree layout with rotated thumb keys and a duplicate.
pub const DTS_LAYOUT: &str = r#"
#include <physical_layouts.dtsi>

/ {
    split_layout: split_layout {
        compatible = "zmk,physical-layout";
        display-name = "Split";

        keys  //                     w   h    x    y     rot   rx   ry
            = <&key_physical_attrs 100 100    0    0       0    0    0>
            , <&key_physical_attrs 100 100  100    0       0    0    0>
            , <&key_physical_attrs 100 150  250  100    1500  250  100>
            , <&key_physical_attrs 100 100  400    0       0    0    0>
            , <&key_physical_attrs 100 100  500    0 (-1500)  600  100>
            , <&key_physical_attrs 100 100    0    0       0    0    0>
            ;
    };
};
"#;

/// Three-layer ZMK keymap for [`DTS_LAYOUT`].
pub const DTS_KEYMAP: &str = r#"
/ {
    keymap {
        compatible = "zmk,keymap";

        base_layer {
            display-name = "Base";
            bindings = <
            // -----------------------------------
                &kp Q  &kp W  &lt 1 SPACE
                &mt LSHFT ESC  &kp N1
            >;
        };

        lower_layer {
            label = "Lower";
            bindings = <&trans &mF5 &kp LBKT &bogus &kp FSLH>;
        };

        raise_layer {
            bindings = <
                &kp PG_UP &toJIS 0 INT3 &mo 2
            >;
        };
    };
};
"#;

/// QMK keymap with two layers.
pub const QMK_KEYMAP: &str = r"
#include QMK_KEYBOARD_H

enum layers { _BASE, _FN };

const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {
    [_BASE] = LAYOUT_split_3x5_2(
        KC_A,    KC_B,    LCTL(KC_C),  KC_QUOT,
        KC_SLSH
    ),
    [_FN] = LAYOUT_split_3x5_2(
        _______, 0x0068,  KC_MS_BTN1,  KC_WWW_BACK,
        KC_INT1
    )
};
";

/// Writes `content` into `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// A `keyviz` command whose config directory points inside `home`.
pub fn keyviz(home: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_keyviz"));
    command
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("APPDATA", home.path().join("AppData"))
        .env_remove("RUST_LOG");
    command
}
