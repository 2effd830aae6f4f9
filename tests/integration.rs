mod common;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use common::Harness;
use owner_fixer::Server;
use owner_fixer::messages::Locale;

struct HookClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl HookClient {
    async fn connect(harness: &Harness, locale: Locale) -> Self {
        let server = Server::with_engine(
            "127.0.0.1:0",
            harness.engine.clone(),
            harness.runtime.clone(),
            locale,
            256,
        )
        .await
        .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.start());

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    // Helper to send a command and read the JSON answer
    async fn send(&mut self, command: &str) -> Value {
        self.writer
            .write_all(format!("{}\r\n", command).as_bytes())
            .await
            .unwrap();
        self.writer.flush().await.unwrap();

        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(line.trim_end()).unwrap()
    }
}

#[tokio::test]
async fn test_check_rejection_is_localized() {
    let harness = Harness::standard();
    let mut client = HookClient::connect(&harness, Locale::Tr).await;

    let response = client.send("CHECK alice - 1048576").await;
    assert_eq!(response["status"], "error");
    assert_eq!(
        response["data"]["message"],
        "Kota limitini aştınız. Yüklediğiniz dosya 1 MB boyutunda, fakat 0.488 MB kullanılabilir disk alanınız var"
    );

    let response = client.send("check mallory - 1").await;
    assert_eq!(
        response["data"]["message"],
        "Ldap kullanıcısı değilsiniz. Yükleme yapılamaz."
    );

    let response = client.send("CHECK alice - 1024 2048").await;
    assert_eq!(response["status"], "success");
    assert_eq!(response["data"]["allowed"], true);
}

#[tokio::test]
async fn test_check_uses_indexed_candidate_size() {
    let harness = Harness::standard();
    harness.register(5, "alice", "files/big.iso", 1_048_576);
    let mut client = HookClient::connect(&harness, Locale::En).await;

    let response = client.send("CHECK alice 5").await;
    assert_eq!(response["status"], "error");

    // Size of an unknown candidate cannot be determined
    let response = client.send("CHECK alice 999").await;
    assert_eq!(response["status"], "error");
    assert_eq!(response["data"]["message"], "unknown file id: 999");

    // An explicit batch still decides on its own
    let response = client.send("CHECK alice 999 1024").await;
    assert_eq!(response["status"], "success");

    let response = client.send("CHECK admin 999").await;
    assert_eq!(response["status"], "success");
}

#[tokio::test]
async fn test_written_then_status() {
    let harness = Harness::standard();
    harness.register(40, "bob", "files/report.pdf", 10);
    let mut client = HookClient::connect(&harness, Locale::En).await;

    let response = client.send("WRITTEN 40").await;
    assert_eq!(response["status"], "success");
    assert_eq!(response["data"]["fixed"], true);
    assert_eq!(response["data"]["outcome"], "corrected");

    let response = client.send("STATUS 40").await;
    assert_eq!(response["data"]["status"], "fixed");

    let response = client.send("STATUS 41").await;
    assert_eq!(response["data"]["status"], Value::Null);
}

#[tokio::test]
async fn test_failed_write_fix_is_left_for_sweep() {
    let harness = Harness::new(common::directory(), None, 5);
    harness.register(50, "alice", "files/a", 10);
    let mut client = HookClient::connect(&harness, Locale::En).await;

    let response = client.send("WRITTEN 50").await;
    assert_eq!(response["status"], "success");
    assert_eq!(response["data"]["fixed"], false);

    let response = client.send("STATUS 50").await;
    assert_eq!(response["data"]["status"], "pending");

    harness.corrector.set_exit_code(0);
    let response = client.send("SWEEP").await;
    assert_eq!(response["status"], "success");
    assert_eq!(response["data"]["examined"], 1);
    assert_eq!(response["data"]["corrected"], 1);

    let response = client.send("STATUS 50").await;
    assert_eq!(response["data"]["status"], "fixed");
}

#[tokio::test]
async fn test_bad_commands_keep_connection_open() {
    let harness = Harness::standard();
    let mut client = HookClient::connect(&harness, Locale::En).await;

    let response = client.send("CHOWN /etc/passwd").await;
    assert_eq!(response["status"], "error");
    assert_eq!(response["data"]["message"], "unknown command");

    let response = client.send("WRITTEN abc").await;
    assert_eq!(response["data"]["message"], "invalid file id: abc");

    let response = client.send("CHECK alice - 18446744073709551615 2048").await;
    assert_eq!(response["status"], "error");
    assert_eq!(response["data"]["message"], "invalid upload size");

    let response = client.send(&format!("CHECK alice - {}", "1 ".repeat(200))).await;
    assert_eq!(response["data"]["message"], "command too long");

    let response = client.send("QUIT").await;
    assert_eq!(response["status"], "success");

    let mut rest = String::new();
    let n = client.reader.read_line(&mut rest).await.unwrap();
    assert_eq!(n, 0);
}
