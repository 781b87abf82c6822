use std::net::UdpSocket;

/// Devine l'adresse IP locale de la machine.
///
/// Ouvre un socket UDP lié à `0.0.0.0:0` puis le « connecte » vers un serveur
/// DNS public (`8.8.8.8:80`) : UDP étant sans connexion, aucun paquet n'est
/// émis, mais le système choisit l'interface qui servirait à joindre cette
/// adresse, ce qui donne l'IP locale à annoncer dans les URLs.
///
/// # Returns
///
/// L'adresse IP locale sous forme de `String`, ou `"127.0.0.1"` si une étape
/// échoue.
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}
