use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Exact-match substitutions of device-unfriendly host phrases by canonical short forms.
pub type Translations = HashMap<&'static str, &'static str>;

/// Parameter names as reported by the host in its various UI languages.
pub static PARAMETER_NAME_TRANSLATIONS: Lazy<Translations> = Lazy::new(|| {
    HashMap::from([
        // English
        ("Left-Right", "Pan"),
        ("Pan Left-Right", "Pan"),
        // German
        ("Pan links/rechts", "Pan"),
        // Spanish
        ("Pan izquierda-derecha", "Pan"),
        // French
        ("Pan gauche-droit", "Pan"),
        ("Pré/Post", "PrePost"),
        // Italian
        ("Pan sinistra-destra", "Pan"),
        ("Monitoraggio", "Monitor"),
        // Japanese
        ("左右パン", "Pan"),
        ("モニタリング", "Monitor"),
        ("レベル", "Level"),
        // Portuguese
        ("Pan Esquerda-Direita", "Pan"),
        ("Nível", "Nivel"),
        ("Pré/Pós", "PrePost"),
        // Russian
        ("Панорама Лево-Право", "Pan"),
        ("Монитор", "Monitor"),
        ("Уровень", "Level"),
        ("Пре/Пост", "PrePost"),
        // Chinese
        ("声像 左-右", "Pan"),
        ("监听", "Monitor"),
        ("电平", "Level"),
        ("前置/后置", "PrePost"),
    ])
});

/// Parameter display values as reported by the host in its various UI languages.
pub static PARAMETER_VALUE_TRANSLATIONS: Lazy<Translations> = Lazy::new(|| {
    HashMap::from([
        // French
        ("Éteint", "Eteint"),
        // Japanese
        ("オン", "On"),
        ("オフ", "Off"),
        // Russian
        ("Вкл.", "On"),
        ("Выкл.", "Off"),
        // Chinese
        ("开", "On"),
        ("关", "Off"),
    ])
});

/// Returns the translation of `input` or `input` itself if the table has no entry for it.
pub fn translate<'a>(input: &'a str, translations: &Translations) -> &'a str {
    translations.get(input).copied().unwrap_or(input)
}
