// 使用 mimalloc 作为全局内存分配器
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    if let Err(e) = polyglot_press::run().await {
        tracing::error!(%e, "server exited with error");
        std::process::exit(1);
    }
}
