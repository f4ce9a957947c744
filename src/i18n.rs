use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        // last
        en.insert("copied_to_clipboard".to_string(), "Copied to clipboard!".to_string());
        en.insert("copy_failed".to_string(), "Failed to copy to clipboard: {0}".to_string());
        en.insert("no_data".to_string(), "No terminal history found (tried: {0}).".to_string());
        en.insert("no_data_hint".to_string(), "Run 'context init' to set up shell integration.".to_string());
        en.insert("error_read_history".to_string(), "Failed to read terminal history".to_string());
        // purge
        en.insert("purge_done".to_string(), "Removed {0} log files older than {1} days".to_string());
        en.insert("purge_failed".to_string(), "{0} log files could not be removed".to_string());
        en.insert("error_purge".to_string(), "Failed to clean log directory".to_string());
        // init
        en.insert("init_title".to_string(), "Shell Integration Setup".to_string());
        en.insert("init_intro".to_string(), "To enable 'context last', add one of the following to your shell config:".to_string());
        en.insert("init_restart".to_string(), "After setup, restart your terminal or source your shell config again.".to_string());
        en.insert("init_sources".to_string(), "context last reads, in this order:".to_string());
        en.insert("init_source_transcript".to_string(), "terminal transcript (commands and output)".to_string());
        en.insert("init_source_logs".to_string(), "per-command log files".to_string());
        en.insert("init_source_history".to_string(), "shell history (commands only)".to_string());
        en.insert("init_config".to_string(), "Locations can be changed in {0}".to_string());

        // Chinese
        let mut zh = HashMap::new();
        zh.insert("copied_to_clipboard".to_string(), "已复制到剪贴板！".to_string());
        zh.insert("copy_failed".to_string(), "复制到剪贴板失败: {0}".to_string());
        zh.insert("no_data".to_string(), "未找到终端历史（已尝试: {0}）。".to_string());
        zh.insert("no_data_hint".to_string(), "运行 'context init' 配置 shell 集成。".to_string());
        zh.insert("error_read_history".to_string(), "读取终端历史失败".to_string());
        zh.insert("purge_done".to_string(), "已删除 {0} 个超过 {1} 天的日志文件".to_string());
        zh.insert("purge_failed".to_string(), "{0} 个日志文件无法删除".to_string());
        zh.insert("error_purge".to_string(), "清理日志目录失败".to_string());
        zh.insert("init_title".to_string(), "Shell 集成配置".to_string());
        zh.insert("init_intro".to_string(), "要启用 'context last'，请在 shell 配置中加入以下任一行:".to_string());
        zh.insert("init_restart".to_string(), "配置完成后，请重启终端或重新加载 shell 配置。".to_string());
        zh.insert("init_sources".to_string(), "context last 按以下顺序读取:".to_string());
        zh.insert("init_source_transcript".to_string(), "终端记录（命令及输出）".to_string());
        zh.insert("init_source_logs".to_string(), "单条命令日志".to_string());
        zh.insert("init_source_history".to_string(), "shell 历史（仅命令）".to_string());
        zh.insert("init_config".to_string(), "可在 {0} 中修改路径".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("zh".to_string(), zh);

        let effective_lang = if lang.starts_with("zh") || lang == "cn" || lang == "chinese" {
            "zh"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_selection() {
        assert_eq!(I18n::new("zh_CN").t("copied_to_clipboard"), "已复制到剪贴板！");
        assert_eq!(I18n::new("en_US").t("copied_to_clipboard"), "Copied to clipboard!");
        assert_eq!(I18n::new("fr_FR").t("copied_to_clipboard"), "Copied to clipboard!");
    }

    #[test]
    fn test_format_and_missing_key() {
        let i18n = I18n::new("en");
        assert_eq!(
            i18n.t_format("purge_done", &["3", "7"]),
            "Removed 3 log files older than 7 days"
        );
        assert_eq!(i18n.t("no_such_key"), "no_such_key");
    }

    #[test]
    fn test_every_english_key_is_translated() {
        let i18n = I18n::new("en");
        let en = &i18n.translations["en"];
        let zh = &i18n.translations["zh"];
        for key in en.keys() {
            assert!(zh.contains_key(key), "missing zh translation for {}", key);
        }
    }
}
