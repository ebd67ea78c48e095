#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "中文",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "zh" => Language::Zh,
            _ => Language::En,
        }
    }
}

pub fn detect_system_language() -> Language {
    if let Some(locale) = sys_locale::get_locale() {
        let lang = locale.split('-').next().unwrap_or("en");
        Language::from_code(lang)
    } else {
        Language::En
    }
}

fn get_string(lang: Language, key: &str) -> &'static str {
    match lang {
        Language::En => en(key),
        Language::Zh => {
            let val = zh(key);
            if val.is_empty() { en(key) } else { val }
        }
    }
}

pub fn t(lang: Language, key: &str, vars: &[(&str, &str)]) -> String {
    let mut s = get_string(lang, key).to_string();
    for (k, v) in vars {
        s = s.replace(&format!("{{{{{}}}}}", k), v);
    }
    s
}

pub fn ts(lang: Language, key: &str) -> String {
    get_string(lang, key).to_string()
}

fn en(key: &str) -> &'static str {
    match key {
        "app_title" => "Product Registration Lookup",
        "tab_query" => "Lookup",
        "tab_download" => "Client & Support",
        "badge_connected" => "Service connected",
        "badge_disconnected" => "Service disconnected",
        "engine_label" => "Browser engine",
        "engine_changed" => "Engine changed, reinitialize before querying",
        "init_not_connected" => "Service not connected",
        "init_start" => "Initialize browser",
        "init_again" => "Reinitialize",
        "init_running" => "Initializing...",
        "status_init_ok" => "{{browser}} initialized",
        "status_init_failed" => "Initialize failed: {{error}}",
        "mode_single" => "Single",
        "mode_batch" => "Batch",
        "single_placeholder" => "Enter a registration code...",
        "batch_placeholder" => "One registration code per line, up to 50",
        "query_button" => "Query",
        "batch_button" => "Run batch lookup",
        "query_running" => "Looking up {{code}}...",
        "batch_running" => "Looking up {{count}} codes...",
        "status_query_ok" => "Lookup succeeded",
        "status_need_captcha" => "Captcha shown; solve it in the service browser, then retry",
        "status_not_found" => "No matching product found",
        "status_query_failed" => "Lookup failed: {{error}}",
        "status_batch_done" => "Batch finished: succeeded {{ok}}, failed {{failed}}",
        "status_batch_failed" => "Batch lookup failed: {{error}}",
        "err_empty_code" => "Enter a registration code first",
        "err_empty_batch" => "No valid registration codes in the input",
        "err_batch_too_large" => "At most 50 codes per batch ({{count}} entered)",
        "err_not_initialized" => "Initialize the browser first",
        "err_not_connected" => "Start the local service first",
        "advisory_first_use" => "Welcome! Lookups run through a local helper client. Download and install it from the Client & Support tab to get started.",
        "advisory_reinstall" => "The local service is not running. Start the helper client, or reinstall the latest version from the Client & Support tab.",
        "results_title" => "Results",
        "results_count" => "{{count}} records",
        "export_button" => "Export to Excel",
        "export_dialog_title" => "Export results",
        "export_done" => "Exported to {{path}}",
        "export_failed" => "Export failed: {{error}}",
        "export_no_data" => "No data to export",
        "export_sheet" => "Results",
        "export_file_stem" => "product_lookup_results",
        "download_title" => "Helper client",
        "download_blurb" => "Lookups are performed by a desktop helper that automates a real browser on this machine. The web pages it visits may show captchas; keep its window reachable.",
        "download_button" => "Download client",
        "download_started" => "Download opened in your browser. Run the installer; the service starts automatically afterwards.",
        "contact_title" => "Support",
        "contact_blurb" => "Questions or feedback: WeChat support account prodquery-helper.",
        _ => "???",
    }
}

fn zh(key: &str) -> &'static str {
    match key {
        "app_title" => "理财产品查询工具",
        "tab_query" => "产品查询",
        "tab_download" => "下载与支持",
        "badge_connected" => "服务已连接",
        "badge_disconnected" => "服务未连接",
        "engine_label" => "浏览器类型",
        "engine_changed" => "浏览器类型已变更，请重新初始化",
        "init_not_connected" => "服务未连接",
        "init_start" => "初始化浏览器",
        "init_again" => "重新初始化",
        "init_running" => "初始化中...",
        "status_init_ok" => "{{browser}}浏览器初始化成功",
        "status_init_failed" => "初始化失败: {{error}}",
        "mode_single" => "单个查询",
        "mode_batch" => "批量查询",
        "single_placeholder" => "请输入产品登记编码",
        "batch_placeholder" => "每行一个产品编码，最多50个",
        "query_button" => "开始查询",
        "batch_button" => "开始批量查询",
        "query_running" => "正在查询编码: {{code}}",
        "batch_running" => "正在批量查询 {{count}} 个编码",
        "status_query_ok" => "查询成功",
        "status_need_captcha" => "出现验证码，请在浏览器中处理后重试",
        "status_not_found" => "未找到匹配的产品",
        "status_query_failed" => "查询失败: {{error}}",
        "status_batch_done" => "批量查询完成：成功 {{ok}} 个，失败 {{failed}} 个",
        "status_batch_failed" => "批量查询失败: {{error}}",
        "err_empty_code" => "请输入产品登记编码",
        "err_empty_batch" => "没有找到有效的产品编码",
        "err_batch_too_large" => "批量查询最多支持50个编码，请分批处理",
        "err_not_initialized" => "请先初始化浏览器",
        "err_not_connected" => "请先启动本地服务",
        "advisory_first_use" => "欢迎使用理财产品查询工具。首次使用需要下载安装客户端程序，请前往下载页面安装。",
        "advisory_reinstall" => "本地服务未运行。请启动理财查询助手客户端，或前往下载页面重新安装最新版本。",
        "results_title" => "查询结果",
        "results_count" => "共 {{count}} 条记录",
        "export_button" => "导出Excel",
        "export_dialog_title" => "导出查询结果",
        "export_done" => "结果已导出: {{path}}",
        "export_failed" => "导出失败: {{error}}",
        "export_no_data" => "没有可导出的数据",
        "export_sheet" => "查询结果",
        "export_file_stem" => "理财产品查询结果",
        "download_title" => "客户端下载",
        "download_blurb" => "查询由本机的桌面助手程序完成，它会自动操作一个真实浏览器。访问的页面可能出现验证码，请保持其窗口可见。",
        "download_button" => "下载客户端",
        "download_started" => "下载已开始，请运行下载的程序完成安装，安装完成后服务将自动启动。",
        "contact_title" => "联系我们",
        "contact_blurb" => "如有问题或建议，请添加客服微信：prodquery-helper。",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vars_are_substituted() {
        let s = t(Language::Zh, "status_batch_done", &[("ok", "2"), ("failed", "1")]);
        assert_eq!(s, "批量查询完成：成功 2 个，失败 1 个");
    }

    #[test]
    fn test_missing_zh_key_falls_back_to_en() {
        assert_eq!(get_string(Language::Zh, "app_title"), zh("app_title"));
        // Unknown keys surface the English marker rather than an empty label.
        assert_eq!(ts(Language::Zh, "no_such_key"), "???");
    }
}
