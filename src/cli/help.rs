//! Usage text
//!
//! Printed to stderr for `--help` and after a missing-store error, so that
//! stdout only ever carries codes and name lists.

use totpick_core::config::{DEFAULT_AUTOPASTE_DELAY, DEFAULT_CACHE_LIMIT, DEFAULT_STORE_FILE};

pub fn usage() -> String {
    format!(
        "\
Usage: totpick [OPTIONS] [NAME]

Generate the current TOTP code for NAME from an encrypted JSON store and
type it, copy it, or print it. Without NAME an interactive terminal gets an
fzf picker. Run as a rofi script mode to pick from rofi:

    rofi -modi \"totp:totpick\" -show totp

Options:
  -h, --help               Print this help
      --list               Print entry names, one per line
      --clear-cache        Remove all cached name lists
      --check              Report which external tools are available
  -p, --print              Print the code instead of copying or typing it
      --clipboard          Copy the code to the clipboard
      --no-clipboard       Do not copy the code to the clipboard
      --autopaste          Type the code into the focused window
      --no-autopaste       Do not type the code
      --delay <SECONDS>    Pause between typing the code and pressing Enter
      --file <PATH>        Secret store to read
      --no-encryption      Treat the secret store as plaintext JSON
      --generator <NAME>   TOTP backend: auto, oathtool or builtin
  -v, --verbose            Log debug information to stderr
  -V, --version            Print version

Configuration:
  Settings are read from the environment and from KEY=VALUE lines in
  $XDG_CONFIG_HOME/totpick/config (~/.config/totpick/config), which wins over
  the environment. Command-line options win over both. Boolean settings are
  on for y, yes or 1 (any case) and off for anything else.

  GNUPGHOME              gpg home directory used for decryption
  TOTP_FILE              secret store (default: <config dir>/{store})
  TOTP_NO_ENCRYPTION     store is plaintext JSON (default: no)
  TOTP_AUTOPASTE         type the code and press Enter (default: yes)
  TOTP_AUTOPASTE_DELAY   seconds before Enter (default: {delay})
  TOTP_AUTOCLIPBOARD     copy the code to the clipboard (default: no)
  TOTP_GENERATOR         auto, oathtool or builtin (default: auto)
  TOTP_CACHE_LIMIT       cached name lists to keep (default: {limit})

  TOTPICK_CONFIG_DIR overrides the config directory, TOTPICK_CACHE_DIR the
  name cache directory.

Secret store:
  A JSON object, encrypted with gpg unless TOTP_NO_ENCRYPTION is set:

    {{
      \"GitHub\": {{\"secret\": \"JBSWY3DPEHPK3PXP\", \"digits\": 6, \"period\": 30, \"issuer\": \"GitHub\"}}
    }}

Output:
  Without a display, or with clipboard and autopaste both off, the code is
  printed. On Wayland wl-copy and ydotool are used, on X11 xclip and xdotool.
",
        store = DEFAULT_STORE_FILE,
        delay = DEFAULT_AUTOPASTE_DELAY,
        limit = DEFAULT_CACHE_LIMIT,
    )
}
