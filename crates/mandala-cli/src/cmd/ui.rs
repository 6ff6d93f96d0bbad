use std::path::Path;

/// `mandala ui` — start the HTTP API server.
pub fn run(root: &Path, port: u16, no_open: bool) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("mandala server → http://localhost:{actual_port}");

        tokio::select! {
            res = mandala_server::serve_on(root_buf, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
