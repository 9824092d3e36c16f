use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use thirtyfour::extensions::addons::firefox::FirefoxTools;
use thirtyfour::prelude::*;

pub struct E2eOptions {
    pub geckodriver_url: String,
    pub extension_path: String,
    pub page_url: String,
    pub headless: bool,
}

const FIXTURE_ID: &str = "bd-e2e-bundle";
const FIXTURE_HREF: &str = "/ssr/300000512/BundleDeals2?productIds=1005006904562409:12000038";

pub fn run_e2e(opts: E2eOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    runtime.block_on(run_e2e_async(opts))
}

async fn run_e2e_async(opts: E2eOptions) -> Result<(), String> {
    let extension_path = canonicalize_path(&opts.extension_path)?;

    let mut caps = DesiredCapabilities::firefox();
    if opts.headless {
        caps.set_headless()
            .map_err(|e| format!("Failed to set headless: {}", e))?;
    }

    let driver = WebDriver::new(&opts.geckodriver_url, caps)
        .await
        .map_err(|e| format!("Failed to connect to geckodriver: {}", e))?;

    let tools = FirefoxTools::new(driver.handle.clone());
    tools
        .install_addon(&extension_path.display().to_string(), Some(true))
        .await
        .map_err(|e| format!("Failed to install extension: {}", e))?;

    let mut errors = Vec::new();

    if let Err(e) = check_injected_link_highlighted(&driver, &opts.page_url).await {
        errors.push(format!("Highlight check failed: {}", e));
    }

    if let Err(e) = check_plain_links_untouched(&driver).await {
        errors.push(format!("Plain link check failed: {}", e));
    }

    driver.quit().await.ok();

    if errors.is_empty() {
        println!("E2E checks passed");
        Ok(())
    } else {
        Err(format!("E2E failed:\n- {}", errors.join("\n- ")))
    }
}

/// Inject a bundle link after load; the mutation observer must pick it up.
async fn check_injected_link_highlighted(driver: &WebDriver, page_url: &str) -> Result<(), String> {
    driver.goto(page_url)
        .await
        .map_err(|e| format!("Failed to navigate to {}: {}", page_url, e))?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    let script = format!(
        "const a = document.createElement('a'); a.id = '{}'; a.href = '{}'; a.textContent = 'bundle'; document.body.appendChild(a); return true;",
        FIXTURE_ID, FIXTURE_HREF
    );
    eval_bool(driver, &script)
        .await
        .map_err(|e| format!("Failed to inject fixture link: {}", e))?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let marked = eval_bool(
        driver,
        &format!("return document.getElementById('{}')?.dataset.bundleDeal === 'true';", FIXTURE_ID),
    )
    .await
    .map_err(|e| format!("Failed to read marker: {}", e))?;
    if !marked {
        return Err("Injected bundle link was not highlighted".to_string());
    }
    Ok(())
}

async fn check_plain_links_untouched(driver: &WebDriver) -> Result<(), String> {
    let stray = eval_bool(
        driver,
        "return [...document.querySelectorAll('a[data-bundle-deal]')].some(a => !/bundledeals|productids=/i.test(decodeURIComponent(a.getAttribute('href') || '')));",
    )
    .await
    .map_err(|e| format!("Failed to inspect links: {}", e))?;
    if stray {
        return Err("A non-bundle link carries the highlight marker".to_string());
    }
    Ok(())
}

async fn eval_bool(driver: &WebDriver, script: &str) -> WebDriverResult<bool> {
    let result = driver.execute(script, Vec::<Value>::new()).await?;
    Ok(result.json().as_bool().unwrap_or(false))
}

fn canonicalize_path(path: &str) -> Result<PathBuf, String> {
    std::fs::canonicalize(path)
        .map_err(|e| format!("Failed to resolve '{}': {}", path, e))
}
