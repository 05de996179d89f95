#![no_main]
use libfuzzer_sys::fuzz_target;
use xedit::{DisableParentRelativePath, Recipe};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let recipe = DisableParentRelativePath::new();
        if let Ok(once) = recipe.apply(s) {
            assert_eq!(recipe.apply(&once).ok(), Some(once));
        }
    }
});
