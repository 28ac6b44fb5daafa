use crate::common::{
    keys::{CertificateBundle, KeyPair},
    mock_server::{MockServerConfiguration, MyBankMockServer},
};
use mybank_rust::{
    client::Environment,
    config::{Config, HttpConfig, InstantPayConfig, TcConfig, TcSignType},
    params::ParameterSet,
    signing::DigestAlgorithm,
    MyBankClient,
};
use rand::Rng;
use secrecy::SecretString;
use std::path::PathBuf;

pub static PARTNER_ID: &str = "200001234567";
pub static OID_PARTNER: &str = "201103171000000000";
pub static TC_NOTIFY_URL: &str = "https://partner.example.com/mybank/notify";
pub static INSTANT_PAY_NOTIFY_URL: &str = "https://partner.example.com/lianlian/notify";

pub struct TestContext {
    pub client: MyBankClient,
    pub config: Config,
    mock_server: MyBankMockServer,
    mock_configuration: MockServerConfiguration,
    cert_path: PathBuf,
}

impl TestContext {
    /// Client signing MYBank requests with a PKCS#12 certificate.
    pub async fn start() -> Self {
        Self::start_with(TcSignType::Twsign).await
    }

    /// Client signing MYBank requests with an RSA private key.
    pub async fn start_with_rsa() -> Self {
        Self::start_with(TcSignType::Rsa).await
    }

    async fn start_with(sign_type: TcSignType) -> Self {
        super::init_tracing();

        // Fresh credentials for every test
        let certificate = CertificateBundle::generate("partner-secret");
        let partner_tc_key = KeyPair::generate();
        let partner_instant_pay_key = KeyPair::generate();
        let mybank_key = KeyPair::generate();
        let lianlian_key = KeyPair::generate();

        let cert_path = std::env::temp_dir().join(format!(
            "mybank-rust-{}.p12",
            rand::thread_rng().gen::<u64>()
        ));
        std::fs::write(&cert_path, &certificate.der).unwrap();

        let mock_configuration = MockServerConfiguration {
            partner_id: PARTNER_ID.to_string(),
            oid_partner: OID_PARTNER.to_string(),
            partner_certificate: certificate.cert.clone(),
            partner_tc_public_key: partner_tc_key.public_key_pem.clone(),
            partner_instant_pay_public_key: partner_instant_pay_key.public_key_pem.clone(),
            mybank_key: mybank_key.clone(),
            lianlian_key: lianlian_key.clone(),
        };
        let mock_server = MyBankMockServer::start(mock_configuration.clone()).await;

        let config = Config {
            production: false,
            http: HttpConfig::default(),
            tc: TcConfig {
                partner_id: PARTNER_ID.to_string(),
                charset: "utf-8".to_string(),
                version: "2.1".to_string(),
                sign_type,
                cert_path: Some(cert_path.to_string_lossy().into_owned()),
                cert_password: Some(SecretString::new(certificate.passphrase.clone())),
                private_key: Some(SecretString::new(partner_tc_key.private_key_pem.clone())),
                digest: DigestAlgorithm::Sha1,
                // Keys are usually configured without PEM armor
                public_key: mybank_key.bare_public_key(),
                notify_url: Some(TC_NOTIFY_URL.to_string()),
            },
            instant_pay: InstantPayConfig {
                oid_partner: OID_PARTNER.to_string(),
                platform: "partner.example.com".to_string(),
                private_key: SecretString::new(partner_instant_pay_key.private_key_pem.clone()),
                ll_public_key: lianlian_key.bare_public_key(),
                notify_url: Some(INSTANT_PAY_NOTIFY_URL.to_string()),
            },
        };

        let client = MyBankClient::builder(config.clone())
            .with_environment(Environment::from_single_url(mock_server.url()).unwrap())
            .build()
            .unwrap();

        Self {
            client,
            config,
            mock_server,
            mock_configuration,
            cert_path,
        }
    }

    pub fn mock_server(&self) -> &MyBankMockServer {
        &self.mock_server
    }

    pub fn environment(&self) -> Environment {
        Environment::from_single_url(self.mock_server.url()).unwrap()
    }

    /// Signs `params` the way MYBank signs its notifications.
    pub fn sign_as_mybank(&self, params: ParameterSet) -> ParameterSet {
        self.mock_configuration
            .mybank_signer()
            .sign_request(params)
            .unwrap()
            .into_params()
    }

    /// Signs `params` the way LianLian signs its notifications.
    pub fn sign_as_lianlian(&self, mut params: ParameterSet) -> ParameterSet {
        params.insert("sign_type", "RSA");
        self.mock_configuration
            .lianlian_signer()
            .sign_request(params)
            .unwrap()
            .into_params()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.cert_path);
    }
}
